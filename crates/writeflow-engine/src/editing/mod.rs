/*!
 * # Editing Core Module
 *
 * This module owns the text of an open document and every way it can change.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: `EditSession`
 * - The document text lives in one `String` owned by an **`EditSession`**
 * - Nothing else writes to it; the analysis service only ever *proposes* edits
 * - A session is created per loaded document and dropped on navigation
 *
 * ### 2. Suggestion Application
 * - **Positioned** suggestions carry half-open char offsets and are spliced directly
 * - **Textual** suggestions are located by a normalized, whole-word,
 *   case-insensitive search (`locate`)
 * - **Apply All** sorts positioned suggestions by start and walks them with a
 *   running length offset, so one pass keeps every later span valid
 *
 * ### 3. Snapshot History
 * - Every forward edit records the pre-edit text on the undo stack (`history`)
 * - A batch records exactly one snapshot regardless of how many splices it made
 * - Typing and formatting clear the redo stack; suggestion application does not
 *
 * ### 4. Offsets
 * - Positions are char offsets; `offsets` converts to byte ranges and clamps
 *   anything out of range instead of panicking
 *
 * ## Module Structure
 *
 * - **`session`**: `EditSession` and `EditError`
 * - **`history`**: bounded-or-unbounded undo/redo snapshot stacks
 * - **`locate`**: fragment normalization and whole-word search
 * - **`offsets`**: char/byte conversion, clamping and change regions
 * - **`format`**: bold/italic/underline markers
 * - **`patch`**: edit results (`Patch`, `BatchReport`)
 *
 * ## Usage Pattern
 *
 * ```rust
 * use writeflow_engine::editing::*;
 * use writeflow_engine::models::{Span, Suggestion};
 *
 * let mut session = EditSession::new("Teh colour is nice");
 * session.set_suggestions(vec![
 *     Suggestion::positioned("s1", Span::new(0, 3), "Teh", "The"),
 *     Suggestion::textual("s2", "colour", "color"),
 * ]);
 *
 * session.apply_one("s1").unwrap();
 * assert_eq!(session.content(), "The colour is nice");
 *
 * session.format_range(Span::new(14, 18), FormatStyle::Bold).unwrap();
 * session.undo().unwrap();
 * session.redo().unwrap();
 * assert_eq!(session.content(), "The colour is **nice**");
 * ```
 */

pub mod format;
pub mod history;
pub mod locate;
pub mod offsets;
pub mod patch;
pub mod session;

pub use format::FormatStyle;
pub use history::History;
pub use patch::{BatchReport, Patch};
pub use session::{EditError, EditSession};
