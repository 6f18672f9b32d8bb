//! Output writers for one-shot `fetch` runs.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── yahoo.json
//!     ├── jtbc.json
//!     └── ifeng.json
//! ```

pub mod json;
