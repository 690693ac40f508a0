//! Carton: embed file trees into generated Rust source
//!
//! A carton is a generated source artifact holding a compressed, text-safe
//! copy of every file in a tree, plus each file's modification time. Ship
//! the artifact inside a binary and the program no longer needs its data
//! directory at runtime, while development keeps working against live
//! files: lookups transparently prefer a newer on-disk copy over the
//! embedded one.
//!
//! ## How it fits together
//!
//! - [`Encoder`] runs offline: it walks a tree, pushes every regular file
//!   through the codec (gzip at maximum level, radix-85 text encoding, a
//!   reserved-character escape for the target literal syntax, 80-column
//!   wrap), and renders one generated source file from a template.
//! - [`EmbeddedStore`] is the runtime half: the generated artifact builds
//!   one from its records, and callers use [`EmbeddedStore::files`] and
//!   [`EmbeddedStore::get`] to list and read content.
//! - The generator's own template is itself embedded ([`assets::carton`]),
//!   so regenerating this crate's artifact is self-hosting; the bootstrap
//!   path ([`Encoder::from_template_file`]) only matters before a first
//!   artifact exists.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use carton_rs::{assets, Encoder};
//!
//! # fn main() -> carton_rs::Result<()> {
//! // Generate an artifact for your own asset tree (build step).
//! let encoder = Encoder::from_store("my_crate", "assets", assets::carton())?;
//! let report = encoder.generate(Path::new("assets"), Path::new("src/assets.rs"))?;
//! println!("embedded {} files", report.embedded);
//! # Ok(())
//! # }
//! ```
//!
//! At runtime the generated module answers lookups:
//!
//! ```rust
//! use carton_rs::assets;
//!
//! let store = assets::carton();
//! for path in store.files() {
//!     let bytes = store.get(path).unwrap();
//!     println!("{path}: {} bytes", bytes.len());
//! }
//! ```

pub mod assets;
pub mod codec;
pub mod encoder;
pub mod error;
pub mod store;

pub use codec::{Codec, EscapeRule};
pub use encoder::{Encoder, GenerationReport, TEMPLATE_KEY};
pub use error::{CartonError, Result};
pub use store::{EmbeddedStore, FileRecord};

/// Crate version, stamped into generated artifacts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
