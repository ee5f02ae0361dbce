//! # Block Segmentation
//!
//! Two-phase splitting of a line stream into paragraphs.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): Each line is classified into a `LineClass`
//!    containing local facts (indentation, annotation tokens, fence detection, blank status)
//!
//! 2. **Paragraph Construction** (`builder`): A `BlockBuilder` tracks the open leaf
//!    block and emits `Paragraph`s as blocks close
//!
//! ## Modules
//!
//! - **`kinds`**: Delimiter rules for fences and indentation (`CodeFence`, `Indent`)
//! - **`classify`**: `MarkdownLineClassifier` produces `LineClass` for each line
//! - **`builder`**: `BlockBuilder` state machine for paragraph construction
//!
//! ## Key Invariants
//!
//! - Fenced code blocks are raw zones: lines inside are kept verbatim and never
//!   recognized as headers, annotations or blank separators
//! - A fence closes only on the same character with at least the opening length
//! - Every paragraph is emitted exactly once, in document order

pub mod builder;
pub mod classify;
pub mod kinds;

pub use builder::BlockBuilder;
pub use classify::{LineClass, MarkdownLineClassifier};
