// Operator intake: interactive collection of scouting requirements.

pub mod collector;
