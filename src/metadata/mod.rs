/*!
 * Metadata generation for chapter PDFs.
 *
 * - `prompts`: built-in profiles (instruction, title fallback, walk rules) per scripture
 * - `generator`: the per-file pipeline and the sequential directory walk
 * - `response`: cleaning and post-processing of model replies
 * - `title`: fallback titles derived from paths
 */

pub mod generator;
pub mod prompts;
pub mod response;
pub mod title;

pub use generator::{collect_pdfs, ItemOutcome, MetadataGenerator, RunSummary, WalkMode, WalkOptions};
pub use prompts::{MetadataProfile, PromptTemplate};
pub use response::{ChapterMetadata, DeeperInsights, KeyConcept};
pub use title::TitleFallback;
