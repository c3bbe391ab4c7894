// Command-line definitions, parsed once in `main`.
pub mod cmd_enums;
