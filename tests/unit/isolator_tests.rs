/*!
 * Tests for the chapter isolator
 */

use gurukul::segmentation::isolator::{ChapterIsolator, MarkerVariant};
use crate::common;

/// Test that a chapter runs up to, but not including, the next chapter marker
#[test]
fn test_isolate_withNextChapter_shouldStopBeforeIt() {
    let text = "Intro CHAPTER 5 foo text CHAPTER 6 bar text";
    let chapter = ChapterIsolator::isolate(text, 5).expect("chapter 5 should be found");

    assert_eq!(chapter.text, "CHAPTER 5 foo text ");
    assert_eq!(&text[chapter.start..chapter.end], chapter.text);
    assert_eq!(chapter.variant, MarkerVariant::Label);
}

/// Test that the last chapter runs to the end of the text
#[test]
fn test_isolate_lastChapter_shouldRunToEndOfText() {
    let text = "CHAPTER 5 foo CHAPTER 6 bar and the rest";
    let chapter = ChapterIsolator::isolate(text, 6).expect("chapter 6 should be found");

    assert_eq!(chapter.text, "CHAPTER 6 bar and the rest");
    assert_eq!(chapter.end, text.len());
}

/// Test that a mention of the next chapter before the start marker is ignored
#[test]
fn test_isolate_withEarlierForwardReference_shouldNotEndEarly() {
    let text = common::sample_book_text();
    let chapter = ChapterIsolator::isolate(text, 2).expect("chapter 2 should be found");

    assert_eq!(chapter.text, "CHAPTER 2\nThe middle.\n");
}

/// Test that matching is case-insensitive and respects word boundaries
#[test]
fn test_isolate_shouldNotConfuseChapterOneWithTen() {
    let text = "chapter 10 ten\nChapter 1 one\nCHAPTER 2 two";
    let chapter = ChapterIsolator::isolate(text, 1).expect("chapter 1 should be found");

    assert_eq!(chapter.text, "Chapter 1 one\n");
}

/// Test that a missing start marker is reported as None
#[test]
fn test_isolate_withMissingChapter_shouldReturnNone() {
    assert!(ChapterIsolator::isolate(common::sample_book_text(), 9).is_none());
    assert!(ChapterIsolator::isolate(common::sample_book_text(), 0).is_none());
    assert!(ChapterIsolator::isolate_ocr("no markers here", 1).is_none());
}

/// Test the abbreviated marker used by OCR'd scans
#[test]
fn test_isolateOcr_withAbbreviatedMarkers_shouldFallBackToLastVariant() {
    let text = "Ch 3 the third\nCh 4 the fourth";
    assert!(ChapterIsolator::isolate(text, 3).is_none());

    let chapter = ChapterIsolator::isolate_ocr(text, 3).expect("OCR variants should find Ch. 3");
    assert_eq!(chapter.variant, MarkerVariant::Abbreviated);
    assert_eq!(chapter.text, "Ch 3 the third\n");
}
