/*!
 * Text segmentation for scripture sources.
 *
 * - `profile`: the verse pattern lookup table (per-scripture strategy data)
 * - `segmenter`: splits raw text into ordered verse/chapter records
 * - `isolator`: slices one numbered chapter out of a full document
 * - `text_source`: loads text from PDF or plain-text files
 */

pub mod profile;
pub mod segmenter;
pub mod isolator;
pub mod text_source;

pub use profile::{PatternLookupTable, ScriptureProfile, Strategy};
pub use segmenter::{RecordKind, SegmentationSummary, Segmenter, VerseRecord};
pub use isolator::{ChapterIsolator, IsolatedChapter};
