// Low-level helpers used by the installers and the orchestrator.

// Downloads and file type detection.
pub mod assets;
// Executable bits, archive member lookup, PATH probing.
pub mod binary;
// Archive extraction.
pub mod compression;
// Atomic, protection-clearing file installation.
pub mod file_operations;
// `~` expansion and home directory lookup.
pub mod path_helpers;
// OS family and target triple.
pub mod platform;
