//! SQL statement file harvester.
//!
//! Collects every `.sql` file from the given local directories and git
//! repositories into one flat output directory, renaming each copy to a
//! fresh `<uuid>.sql`.
//!
//! # Guarantees
//! - Source files are copied byte-for-byte and never modified
//! - Temporary clones are removed when their target finishes
//! - A failing target or file never changes the exit status

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    sqlharvest::run(std::env::args_os()).await
}
