/*!
 * Built-in metadata profiles: instruction template, title fallback and PDF walk per scripture.
 *
 * Every template asks for the same per-chapter object:
 * `chapterTitle`, `aiSummary`, `keyConcepts[{term, definition}]`, `searchTags[]` and
 * `deeperInsights{philosophicalViewpoint, practicalAdvice[]}`. Templates differ only in
 * the reader they address, the counts requested and what each field should emphasise.
 */

use std::path::Path;

use anyhow::{Context, Result};

use crate::metadata::generator::{WalkMode, WalkOptions};
use crate::metadata::title::TitleFallback;

/// Identifier of the profile used when no scripture is given
pub const GENERIC_PROFILE: &str = "generic";

/// Parameterised instruction text
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    // @field: Opening line naming the reader the model plays
    pub persona: &'static str,
    // @field: Example value for chapterTitle
    pub title_example: &'static str,
    pub summary_sentences: &'static str,
    pub summary_focus: &'static str,
    pub concept_count: &'static str,
    pub concept_focus: &'static str,
    pub tag_count: &'static str,
    pub tag_focus: &'static str,
    pub viewpoint_focus: &'static str,
    pub advice_count: &'static str,
    pub advice_focus: &'static str,
}

impl PromptTemplate {
    /// Render the full instruction sent with each PDF
    pub fn render(&self) -> String {
        format!(
            "{persona}\n\
             Read the attached PDF, which holds a single chapter, and describe it as one JSON object with these fields:\n\
             \n\
             1. \"chapterTitle\": the chapter title exactly as printed in the PDF (for example \"{title_example}\"). Remove OCR noise but keep diacritics.\n\
             2. \"aiSummary\": {summary_sentences} sentences summarising the chapter. {summary_focus}\n\
             3. \"keyConcepts\": {concept_count} objects of the form {{\"term\": \"...\", \"definition\": \"...\"}}. {concept_focus}\n\
             4. \"searchTags\": {tag_count} short lowercase strings. {tag_focus}\n\
             5. \"deeperInsights\": an object with\n\
             \x20  - \"philosophicalViewpoint\": one paragraph. {viewpoint_focus}\n\
             \x20  - \"practicalAdvice\": a list of {advice_count} plain strings (not objects). {advice_focus}\n\
             \n\
             Base every statement on the chapter itself. Reply with the JSON object only: no markdown fences, no commentary before or after it.",
            persona = self.persona,
            title_example = self.title_example,
            summary_sentences = self.summary_sentences,
            summary_focus = self.summary_focus,
            concept_count = self.concept_count,
            concept_focus = self.concept_focus,
            tag_count = self.tag_count,
            tag_focus = self.tag_focus,
            viewpoint_focus = self.viewpoint_focus,
            advice_count = self.advice_count,
            advice_focus = self.advice_focus,
        )
    }
}

/// Everything the metadata walk needs to know about one scripture
#[derive(Debug, Clone)]
pub struct MetadataProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt: PromptTemplate,
    pub title: TitleFallback,
    pub walk: WalkOptions,
}

impl MetadataProfile {
    /// Instruction text, read from `prompt_file` when given
    pub fn instruction(&self, prompt_file: Option<&Path>) -> Result<String> {
        match prompt_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;
                if text.trim().is_empty() {
                    anyhow::bail!("Prompt file is empty: {}", path.display());
                }
                Ok(text)
            }
            None => Ok(self.prompt.render()),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn generic_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a scholar of classical Indian texts preparing a study library for modern readers.",
        title_example: "Chapter 1 - On the Origin of the Science",
        summary_sentences: "3-5",
        summary_focus: "Cover the main subject and how the chapter develops it.",
        concept_count: "5-7",
        concept_focus: "Use the original Sanskrit term where the chapter uses one and define it in plain English.",
        tag_count: "10-15",
        tag_focus: "Mix topics, Sanskrit terms and themes a reader might search for.",
        viewpoint_focus: "Explain the worldview or principle underlying the chapter.",
        advice_count: "2-3",
        advice_focus: "Each item is one actionable takeaway for a present-day reader.",
    }
}

fn gita_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a teacher of Vedanta and the Bhagavad Gita writing for sincere students of the text.",
        title_example: "Chapter 2 - Sankhya Yoga",
        summary_sentences: "5-7",
        summary_focus: "Follow the dialogue between Krishna and Arjuna and the teaching it arrives at.",
        concept_count: "7-10",
        concept_focus: "Prefer the Sanskrit terms the verses rely on, such as dharma, karma or atman, with precise definitions.",
        tag_count: "15-20",
        tag_focus: "Include the yoga named by the chapter, key Sanskrit terms and the spiritual themes discussed.",
        viewpoint_focus: "Place the chapter's teaching within Vedantic thought and the Gita as a whole.",
        advice_count: "3-5",
        advice_focus: "Each item applies the teaching to daily life and practice.",
    }
}

fn ramayana_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a scholar of the Valmiki Ramayana describing one sarga for readers of the epic.",
        title_example: "Sarga 12 - The Preparations for the Sacrifice",
        summary_sentences: "4-6",
        summary_focus: "Narrate the events of the sarga, who takes part in them and how they move the story forward.",
        concept_count: "6-8",
        concept_focus: "Cover the characters, places and ideals that matter in this sarga.",
        tag_count: "12-18",
        tag_focus: "Include character names, places, the kanda and the themes of the episode.",
        viewpoint_focus: "Draw out the dharma or ethical question the episode turns on.",
        advice_count: "2-3",
        advice_focus: "Each item is a lesson a reader can take from the conduct shown.",
    }
}

fn yoga_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a teacher of classical Yoga explaining Patanjali's Yoga Sutra to practitioners.",
        title_example: "Samadhi Pada",
        summary_sentences: "4-6",
        summary_focus: "Describe the stage of practice or state of mind the sutras of this chapter address.",
        concept_count: "6-8",
        concept_focus: "Define the technical terms of the sutras, such as citta, vritti or samadhi.",
        tag_count: "16-20",
        tag_focus: "Include Sanskrit terms, practices and states of meditation.",
        viewpoint_focus: "Relate the chapter to the Samkhya-Yoga account of mind and liberation.",
        advice_count: "3-4",
        advice_focus: "Each item is a concrete practice or attitude for a practitioner.",
    }
}

fn arthashastra_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a historian of ancient Indian statecraft reading Kautilya's Arthashastra.",
        title_example: "Book 1 Chapter 2. The End of Sciences",
        summary_sentences: "3-5",
        summary_focus: "Explain the rule, institution or policy the chapter sets out and the reasoning given for it.",
        concept_count: "5-7",
        concept_focus: "Focus on terms of governance, administration, law, economy and diplomacy.",
        tag_count: "10-15",
        tag_focus: "Include governance topics, offices, Sanskrit terms and policy themes.",
        viewpoint_focus: "Describe the view of power, order and the king's duty behind the chapter.",
        advice_count: "2-3",
        advice_focus: "Each item relates the chapter to leadership or management today.",
    }
}

fn panchatantra_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a storyteller and scholar of the Panchatantra explaining one fable to modern readers.",
        title_example: "The Monkey and the Wedge",
        summary_sentences: "3-5",
        summary_focus: "Retell the story and state the moral it teaches.",
        concept_count: "5-7",
        concept_focus: "Cover the characters, the niti principle at stake and any proverb the story quotes.",
        tag_count: "10-15",
        tag_focus: "Include the animals or people involved, the moral and the book of the Panchatantra.",
        viewpoint_focus: "Explain the practical wisdom of niti the story illustrates.",
        advice_count: "2-3",
        advice_focus: "Each item is a lesson for conduct in everyday affairs.",
    }
}

fn vastu_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are an architect versed in Vastu Sastra reading a chapter of the traditional texts.",
        title_example: "Chapter 3 - Examination of the Site",
        summary_sentences: "3-5",
        summary_focus: "Describe the building, planning or ritual rules the chapter gives.",
        concept_count: "5-7",
        concept_focus: "Define the architectural and cosmological terms, measures and directions used.",
        tag_count: "10-15",
        tag_focus: "Include building elements, directions, materials and Sanskrit terms.",
        viewpoint_focus: "Explain the relation between space, cosmos and dwelling the chapter assumes.",
        advice_count: "2-3",
        advice_focus: "Each item applies the guidance to designing or arranging a space today.",
    }
}

fn natyashastra_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a scholar of Indian dramaturgy reading Bharata's Natyashastra.",
        title_example: "CHAPTER X. ON HEAD MOVEMENTS",
        summary_sentences: "3-5",
        summary_focus: "Describe the element of performance the chapter codifies.",
        concept_count: "5-7",
        concept_focus: "Define the terms of rasa, bhava, gesture, music or stagecraft the chapter uses.",
        tag_count: "10-15",
        tag_focus: "Include performance elements, Sanskrit terms and art forms.",
        viewpoint_focus: "Explain the aesthetic theory behind the prescriptions.",
        advice_count: "2-3",
        advice_focus: "Each item is guidance for a performer or student of the arts.",
    }
}

fn kamasutra_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a scholar of classical Indian social history reading Vatsyayana's Kama Sutra.",
        title_example: "CHAPTER I. ON ACQUISITION OF DHARMA, ARTHA, AND KAMA",
        summary_sentences: "3-5",
        summary_focus: "Describe the subject of the chapter and its place among the aims of life.",
        concept_count: "5-7",
        concept_focus: "Define the social, ethical and aesthetic terms the chapter relies on.",
        tag_count: "10-15",
        tag_focus: "Include themes, Sanskrit terms and aspects of social life.",
        viewpoint_focus: "Explain how the chapter balances dharma, artha and kama.",
        advice_count: "2-3",
        advice_focus: "Each item is a reflection on relationships or conduct.",
    }
}

fn aryabhatiya_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a historian of Indian mathematics and astronomy reading the Aryabhatiya.",
        title_example: "Ganitapada - Verse 1",
        summary_sentences: "3-5",
        summary_focus: "State the mathematical or astronomical results of the section and how they are expressed.",
        concept_count: "5-7",
        concept_focus: "Define the technical terms, units and methods used.",
        tag_count: "10-15",
        tag_focus: "Include mathematical topics, astronomical objects and Sanskrit terms.",
        viewpoint_focus: "Explain the model of number or cosmos the section works within.",
        advice_count: "2-3",
        advice_focus: "Each item connects the method to study or computation today.",
    }
}

fn manu_prompt() -> PromptTemplate {
    PromptTemplate {
        persona: "You are a scholar of Dharmasastra reading the Laws of Manu in Buhler's translation.",
        title_example: "Chapter II. Sources of the Law",
        summary_sentences: "3-5",
        summary_focus: "Describe the duties, rules or procedures the chapter lays down and for whom.",
        concept_count: "5-7",
        concept_focus: "Define the legal, ritual and social terms of the chapter.",
        tag_count: "10-15",
        tag_focus: "Include topics of law, duty, ritual and social order.",
        viewpoint_focus: "Explain the idea of dharma and order the chapter assumes.",
        advice_count: "2-3",
        advice_focus: "Each item is a reflection on ethics or duty for a modern reader.",
    }
}

fn walk(mode: WalkMode, skip_root_files: bool, excluded: &[&str], file_pattern: Option<&str>) -> WalkOptions {
    WalkOptions {
        mode,
        skip_root_files,
        excluded_files: strings(excluded),
        file_pattern: file_pattern.map(str::to_string),
    }
}

/// Identifiers of the built-in profiles
pub fn builtin_ids() -> Vec<&'static str> {
    builtin_profiles().iter().map(|p| p.id).collect()
}

/// Look up a built-in profile; `None` selects the generic one
pub fn profile_for(id: Option<&str>) -> Option<MetadataProfile> {
    let id = id.unwrap_or(GENERIC_PROFILE);
    builtin_profiles().into_iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Library-wide profile used for scriptures without their own prompt
pub fn generic_profile() -> MetadataProfile {
    MetadataProfile {
        id: GENERIC_PROFILE,
        name: "Gurukul Library",
        prompt: generic_prompt(),
        title: TitleFallback::with_default("Chapter"),
        walk: walk(WalkMode::Sections, true, &[], None),
    }
}

/// All built-in profiles, generic first
pub fn builtin_profiles() -> Vec<MetadataProfile> {
    vec![
        generic_profile(),
        MetadataProfile {
            id: "bhagavad_gita",
            name: "Bhagavad Gita",
            prompt: gita_prompt(),
            title: TitleFallback {
                parent_marker: Some("Chapter".into()),
                strip_prefixes: strings(&["Bhagavad_Gita_", "Bhagvad_Gita_"]),
                strip_patterns: strings(&[r"^(?:Bhagvad|Bhagavad)\s+Gita\s+"]),
                min_len: 5,
                title_case: false,
                default_title: "Bhagavad Gita Chapter".into(),
            },
            walk: walk(
                WalkMode::Recursive,
                true,
                &["Bhagavad_Gita_comm_Sankara_English.pdf", "Bhagavad_Gita_Radhakrishnan.pdf"],
                None,
            ),
        },
        MetadataProfile {
            id: "ramayana_valmiki",
            name: "Ramayana by Valmiki",
            prompt: ramayana_prompt(),
            title: TitleFallback {
                strip_patterns: strings(&[r"^chapter\s+\d+\s+", r"^Sarga\s+\d+\s*[-–]?\s*"]),
                min_len: 5,
                default_title: "Ramayana Chapter".into(),
                ..Default::default()
            },
            walk: walk(
                WalkMode::Recursive,
                true,
                &["Ramayana_of_Valmiki_by_Hari_Prasad_Shastri-English.pdf"],
                None,
            ),
        },
        MetadataProfile {
            id: "yoga_sutra",
            name: "Yoga Sūtra of Patañjali",
            prompt: yoga_prompt(),
            title: TitleFallback {
                strip_patterns: strings(&[r"^Chapter\s+\d+\s+"]),
                title_case: true,
                default_title: "Yoga Sutra Chapter".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Recursive, false, &[], Some(r"(?i)^chapter_")),
        },
        MetadataProfile {
            id: "arthashastra",
            name: "Arthaśāstra",
            prompt: arthashastra_prompt(),
            title: TitleFallback {
                strip_prefixes: strings(&["Arthashastra_", "arthashastra_"]),
                default_title: "Arthashastra Chapter".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Sections, true, &[], None),
        },
        MetadataProfile {
            id: "panchatantra",
            name: "Pañcatantra",
            prompt: panchatantra_prompt(),
            title: TitleFallback {
                parent_marker: Some("ntra_".into()),
                strip_patterns: strings(&[
                    r"^Panch(?:a)?tantra\s+",
                    r"^(?:CAF|WOF|COA|FOP|AWDC)\s+\d+\s*",
                    r"^\d+\s*",
                ]),
                min_len: 0,
                title_case: true,
                default_title: "Panchatantra Story".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Recursive, true, &["Panchatantra-English.pdf"], None),
        },
        MetadataProfile {
            id: "Vastu_Sastra",
            name: "Vastu Sastra Viswakarma",
            prompt: vastu_prompt(),
            title: TitleFallback {
                strip_patterns: strings(&[r"^Chapter\s+\d+\s*[-:]?\s*"]),
                min_len: 5,
                default_title: "Vastu Sastra Chapter".into(),
                ..Default::default()
            },
            walk: walk(
                WalkMode::Recursive,
                true,
                &[
                    "Mayamata_ENGLISH.pdf",
                    "Vastu-Sastra-English-Vol1.pdf",
                    "Vastu-Sastra-English-Vol2-Iconography & Paintings.pdf",
                    "Viswakarma_Vastusastram_Sanskrit.pdf",
                ],
                None,
            ),
        },
        MetadataProfile {
            id: "natyashastra",
            name: "Nāṭyaśāstra",
            prompt: natyashastra_prompt(),
            title: TitleFallback {
                strip_prefixes: strings(&["Chapter_", "chapter_", "CHAPTER_"]),
                default_title: "Natyashastra Chapter".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Recursive, false, &[], None),
        },
        MetadataProfile {
            id: "kamasutra",
            name: "Kama Sutra",
            prompt: kamasutra_prompt(),
            title: TitleFallback {
                strip_patterns: strings(&[r"^KamaSutra\s+"]),
                default_title: "Kama Sutra Chapter".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Recursive, false, &[], None),
        },
        MetadataProfile {
            id: "aryabhatiya",
            name: "Āryabhaṭīya",
            prompt: aryabhatiya_prompt(),
            title: TitleFallback {
                strip_patterns: strings(&[r"^Chapter\s+\d+\s+"]),
                title_case: true,
                default_title: "Aryabhatiya Section".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Recursive, false, &[], Some(r"(?i)^chapter_")),
        },
        MetadataProfile {
            id: "manu_smriti",
            name: "Manusmṛti",
            prompt: manu_prompt(),
            title: TitleFallback {
                strip_patterns: strings(&[r"^Manusmriti\s+Buhler\s+"]),
                default_title: "Manu Smriti Chapter".into(),
                ..Default::default()
            },
            walk: walk(WalkMode::Recursive, false, &[], Some(r"_Chapter_")),
        },
    ]
}
