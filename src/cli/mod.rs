pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CheckArgs, CliArgs, Commands, OutputFormatArg, ProcessArgs, ScanArgs};
pub use output::{OutputFormat, OutputFormatter};
