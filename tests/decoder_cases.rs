use talos::{
    core::decoder::{apply_replacements, decode_text, find_replacements, DecoderConfig, HexDecoder},
    replacement::Replacement,
};

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

#[test]
fn full_input_run_decodes_to_hello_world() {
    let input = "48 65 6C 6C 6F 20 57 6F 72 6C 64";
    let result = decode_text(input);

    assert_eq!(result.num_replacements, 1);
    assert_eq!(result.decoded, "Hello World");
    let rep = &result.replacements[0];
    assert_eq!((rep.start, rep.end), (0, input.len()));
    assert_eq!(rep.hex_run, input);
    assert_eq!(rep.decoded, "Hello World");
}

#[test]
fn two_tokens_are_below_threshold() {
    let result = decode_text("AB CD");
    assert_eq!(result.num_replacements, 0);
    assert!(result.replacements.is_empty());
    assert_eq!(result.decoded, "AB CD");
}

#[test]
fn separate_runs_are_found_independently() {
    let input = "48 65 6C 6C 6F and then FF FF FF junk";
    let result = decode_text(input);

    assert_eq!(result.num_replacements, 2);
    let first = &result.replacements[0];
    let second = &result.replacements[1];
    assert_eq!((first.start, first.end), (0, 15));
    assert_eq!(first.decoded, "Hello ");
    assert_eq!((second.start, second.end), (24, 33));
    assert_eq!(second.hex_run, "FF FF FF ");
    assert_eq!(second.decoded, "\u{FFFD}\u{FFFD}\u{FFFD} ");
    assert!(first.end <= second.start);
    assert_eq!(result.decoded, "Hello and then \u{FFFD}\u{FFFD}\u{FFFD} junk");
}

#[test]
fn trailing_whitespace_is_kept_after_decoded_text() {
    let result = decode_text("41 42 43   tail");
    assert_eq!(result.decoded, "ABC   tail");
    assert_eq!(result.replacements[0].hex_run, "41 42 43   ");
}

#[test]
fn run_may_span_lines_and_drops_interior_whitespace() {
    let result = decode_text("41 42 43\n44 45 46");
    assert_eq!(result.num_replacements, 1);
    assert_eq!(result.decoded, "ABCDEF");
}

#[test]
fn newline_after_run_is_preserved() {
    let result = decode_text("41 42 43\nnext");
    assert_eq!(result.decoded, "ABC\nnext");
}

#[test]
fn tokens_inside_longer_words_do_not_count() {
    assert_eq!(decode_text("0x41 42 43").num_replacements, 0);
    assert_eq!(decode_text("DEADBEEF 41 42").num_replacements, 0);
    assert_eq!(decode_text("41 42 43.").num_replacements, 0);
}

#[test]
fn multibyte_utf8_decodes() {
    assert_eq!(decode_text("C3 A9 74 C3 A9").decoded, "été");
}

#[test]
fn offsets_are_character_based() {
    let input = "héllo → 41 42 43 ok";
    let result = decode_text(input);
    let rep = &result.replacements[0];

    assert_eq!((rep.start, rep.end), (8, 17));
    assert_eq!(char_slice(input, rep.start, rep.end), rep.hex_run);
    assert_eq!(result.decoded, "héllo → ABC ok");
}

#[test]
fn threshold_is_configurable() {
    let loose = HexDecoder::new(DecoderConfig { min_run: 2 }).expect("decoder");
    assert_eq!(loose.decode("AB CD").num_replacements, 1);

    let strict = HexDecoder::new(DecoderConfig { min_run: 4 }).expect("decoder");
    assert_eq!(strict.decode("41 42 43").num_replacements, 0);
    assert_eq!(strict.decode("41 42 43 44").decoded, "ABCD");
}

#[test]
fn derived_stats_follow_replacements() {
    let result = decode_text("41 42 43 and 44 45 46 47 48");
    assert_eq!(result.total_hex_bytes(), 8);
    assert_eq!(result.total_decoded_chars(), 9);
    assert_eq!(result.avg_bytes_per_run(), 4.0);
}

#[test]
fn apply_matches_reverse_order_splicing() {
    let text = "pre 41 42 43 mid 44 45 46 post";
    let reps = find_replacements(text);

    let mut chars: Vec<char> = text.chars().collect();
    for rep in reps.iter().rev() {
        chars.splice(rep.start..rep.end, rep.decoded.chars());
    }
    let spliced: String = chars.into_iter().collect();

    assert_eq!(apply_replacements(text, &reps), spliced);
    assert_eq!(spliced, "pre ABC mid DEF post");
}

#[test]
fn apply_with_no_replacements_is_identity() {
    let empty: Vec<Replacement> = Vec::new();
    assert_eq!(apply_replacements("unchanged", &empty), "unchanged");
}

#[test]
fn information_separators_split_tokens() {
    let result = decode_text("41\x1f42\x1f43");
    assert_eq!(result.num_replacements, 1);
    assert_eq!(result.decoded, "ABC");

    let result = decode_text("41 42 43\x1ctail");
    assert_eq!(result.replacements[0].hex_run, "41 42 43\x1c");
    assert_eq!(result.decoded, "ABC\x1ctail");
}
