// Substitutable capabilities: where frames come from and who finds the hands in them

pub mod camera;
pub mod hands;
