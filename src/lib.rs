#![warn(missing_docs)]
//! Document Core - Headless Rich Text Document Kernel
//!
//! # Overview
//!
//! `document-core` is the structural core of a rich text document editor: a
//! tree of paragraphs with local/global coordinate bookkeeping, selection
//! decomposition, Unicode line breaking and paragraph-level edit operations.
//! It does not render, shape or undo anything itself; the host supplies a
//! [`TextShaper`] for metrics, a [`RenderSurface`] to paint through and an
//! [`UndoRecorder`] to capture mutations into its own history model.
//!
//! # Core Features
//!
//! - **Paragraph Tree**: leaf text paragraphs and vertical stack containers,
//!   nested arbitrarily
//! - **Coordinate Bookkeeping**: every paragraph answers queries in its own
//!   local frame; [`LayoutInfo`] offsets compose across boundaries
//! - **Selection Decomposition**: direct, recursive and breadth-first views
//!   of the content a selection touches
//! - **Line Breaking**: UAX#14-style break candidate scanner with separate
//!   measure and wrap positions
//! - **Edit Operations**: insert, delete (with escalation to join/remove),
//!   split, join and style application, each emitting undo descriptions
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (layout entry, edits, paths)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Selection Decomposition (3 views)          │  ← Selection Data
//! ├─────────────────────────────────────────────┤
//! │  Paragraph Tree (text leaves + panels)      │  ← Content Model
//! ├─────────────────────────────────────────────┤
//! │  LayoutInfo (local/global offset algebra)   │  ← Coordinate Math
//! ├─────────────────────────────────────────────┤
//! │  Line Breaker (UAX#14-style candidates)     │  ← Text Layout
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use document_core::{
//!     CaretPosition, CellShaper, Document, MemoryRecorder, TextRange,
//! };
//!
//! let mut doc = Document::new(Box::new(CellShaper::default()));
//! doc.set_available_width(40.0);
//!
//! let mut recorder = MemoryRecorder::new();
//! doc.insert_text(0, "hello world", &mut recorder).unwrap();
//! doc.layout();
//!
//! let caret = doc.caret_info(CaretPosition::new(6)).unwrap();
//! assert_eq!(caret.caret_x, 6.0);
//!
//! let info = doc.selection_info(TextRange::new(0, 5));
//! assert_eq!(info.recursive_interacting_runs.len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`geometry`] - `Point`/`Rect`/`Thickness` value types
//! - [`types`] - ranges, caret positions, delete requests, paragraph paths
//! - [`caret`] - caret, line and hit-test result records
//! - [`layout_info`] - the local/global offset record and space conversions
//! - [`linebreak`] - line break candidate scanner
//! - [`shaping`] - external text metrics seam
//! - [`style`] - style run surface
//! - [`undo`] - undo recording seam
//! - [`paragraph`] - the paragraph trait and shared node state
//! - [`text_paragraph`] - the leaf text paragraph variant
//! - [`panel`] - the vertical stack container variant
//! - [`selection`] - selection decomposition results
//! - [`document`] - the document owner
//!
//! # Unicode Support
//!
//! - Code points are the addressing unit throughout (`ropey` char indices)
//! - Caret stops honor grapheme clusters, word stops honor word boundaries
//!   (`unicode-segmentation`)
//! - The default shaper measures in terminal cells (`unicode-width`)

pub mod caret;
pub mod document;
pub mod geometry;
pub mod layout_info;
pub mod linebreak;
pub mod panel;
pub mod paragraph;
pub mod selection;
pub mod shaping;
pub mod style;
pub mod text_paragraph;
pub mod types;
pub mod undo;

pub use caret::{CaretInfo, HitTestResult, LineInfo};
pub use document::{Document, DocumentId, EditError};
pub use geometry::{Point, Rect, Thickness};
pub use layout_info::{LayoutInfo, Offsetable};
pub use linebreak::{LineBreak, LineBreaker};
pub use panel::PanelParagraph;
pub use paragraph::{LayoutContext, PaintOptions, ParaState, Paragraph, RenderSurface};
pub use selection::{SelectionInfo, SubRunBFSInfo, SubRunInfo};
pub use shaping::{CellShaper, TextShaper};
pub use style::{StyleId, StyleRun, StyleRunList};
pub use text_paragraph::{PARAGRAPH_TERMINATOR, TextParagraph};
pub use types::{CaretPosition, DeleteInfo, DeleteMode, ParagraphIndex, TextRange};
pub use undo::{EditOp, MemoryRecorder, NullRecorder, PathPrefixRecorder, UndoRecorder};
