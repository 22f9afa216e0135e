// Write-side orchestration

pub mod surveillance_commands;
pub mod update_commands;
