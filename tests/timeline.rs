use pretty_assertions::assert_eq;
use tja_rs::tja::prelude::*;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, but got {actual}"
    );
}

fn cues_of(source: &str) -> Vec<Cue> {
    parse_tja(source)
        .lyric_cues()
        .expect("chart must be timed")
}

#[test]
fn test_two_lyrics_at_120_bpm() {
    let cues = cues_of(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC A\n1111,\n#LYRIC B\n1,\n#END\n",
    );
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "A");
    assert_close(cues[0].start, 0.0);
    assert_close(cues[0].end, 2.0);
    assert_eq!(cues[1].text, "B");
    assert_close(cues[1].start, 2.0);
    assert_close(cues[1].end, 4.0);
    assert_eq!(
        emit(&cues),
        "WEBVTT\n\n00:00.000 --> 00:02.000\nA\n\n00:02.000 --> 00:04.000\nB"
    );
}

#[test]
fn test_offset_shifts_start() {
    let cues = cues_of("OFFSET:-1.5\nBPM:60\nCOURSE:Oni\n#START\n#LYRIC x\n1,\n#END\n");
    assert_close(cues[0].start, 1.5);
    assert_close(cues[0].end, 5.5);

    let cues = cues_of("OFFSET: 0.5 \nBPM:240\nCOURSE:Oni\n#START\n1,\n#LYRIC x\n1,\n#END\n");
    assert_close(cues[0].start, 0.5);
    assert_close(cues[0].end, 1.5);
}

#[test]
fn test_measure_signature_on_empty_measure() {
    let cues = cues_of(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC x\n#MEASURE 3/4\n,\n#END\n",
    );
    assert_close(cues[0].end, 240.0 * 0.75 / 120.0);
}

#[test]
fn test_bpm_change_takes_effect_mid_measure() {
    let cues = cues_of(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC x\n10\n#BPMCHANGE 240\n10,\n#END\n",
    );
    // Half a measure at 120, then half a measure at 240.
    assert_close(cues[0].end, 1.0 + 0.5);
}

#[test]
fn test_empty_lyric_leaves_a_gap() {
    let cues = cues_of(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC a\n1,\n#LYRIC\n1,\n#LYRIC b\n1,\n#END\n",
    );
    let spans: Vec<_> = cues
        .iter()
        .map(|cue| (cue.text.as_str(), to_time(cue.start), to_time(cue.end)))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("a", "00:00.000".to_owned(), "00:02.000".to_owned()),
            ("b", "00:04.000".to_owned(), "00:06.000".to_owned()),
        ]
    );
}

#[test]
fn test_nothing_after_end_is_timed() {
    let cues = cues_of(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC a\n1,\n#END\n#LYRIC b\n1,\n#END\n",
    );
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "a");
}

#[test]
fn test_pending_lyric_without_end_is_dropped() {
    let cues = cues_of("OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC a\n1,\n");
    assert_eq!(cues, vec![]);
}

#[test]
fn test_only_first_course_is_converted() {
    let tja = parse_tja(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n1,\n#END\nCOURSE:Easy\n#START\n#LYRIC a\n1,\n#END\n",
    );
    assert_eq!(tja.courses.len(), 2);
    assert!(!tja.with_lyrics_command());
    assert_eq!(tja.lyric_cues(), Ok(vec![]));
}

#[test]
fn test_commands_only_course_has_no_lyrics() {
    let tja = parse_tja(
        "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#BPMCHANGE 150\n#MEASURE 3/4\n#GOGOSTART\n#END\n",
    );
    assert!(!tja.with_lyrics_command());
}

#[test]
fn test_missing_headers_are_fatal() {
    let err = parse_tja("BPM:120\nCOURSE:Oni\n#START\n#LYRIC a\n1,\n#END\n")
        .lyric_cues()
        .expect_err("OFFSET is missing");
    assert_eq!(err.content(), &ConvertError::MissingHeader("OFFSET".to_owned()));

    let err = parse_tja("OFFSET:0\nCOURSE:Oni\n#START\n#LYRIC a\n1,\n#END\n")
        .lyric_cues()
        .expect_err("BPM is missing");
    assert_eq!(err.content(), &ConvertError::MissingHeader("BPM".to_owned()));
}

#[test]
fn test_malformed_numbers_are_fatal() {
    let source = "OFFSET:0\nBPM:fast\nCOURSE:Oni\n#START\n#LYRIC a\n1,\n#END\n";
    let err = parse_tja(source).lyric_cues().expect_err("BPM is malformed");
    assert_eq!(
        err.content(),
        &ConvertError::InvalidNumber {
            field: "BPM".to_owned(),
            value: "fast".to_owned()
        }
    );
    assert_eq!(&source[err.range()], "BPM:fast");

    let source = "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC a\n#MEASURE 3-4\n1,\n#END\n";
    let err = parse_tja(source).lyric_cues().expect_err("MEASURE is malformed");
    assert_eq!(err.content(), &ConvertError::InvalidMeasure("3-4".to_owned()));
    assert_eq!(&source[err.range()], "#MEASURE 3-4");
}

#[test]
fn test_no_course_is_an_error() {
    let err = parse_tja("OFFSET:0\nBPM:120\n")
        .lyric_cues()
        .expect_err("there is no course");
    assert_eq!(err.content(), &ConvertError::NoCourse);
}
