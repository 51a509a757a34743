//! EBCDIC/ASCII translation and the 3200-byte textual file header

use crate::types::TextEncoding;
use crate::TEXTUAL_HEADER_SIZE;

/// Columns per textual header card
pub const CARD_WIDTH: usize = 80;

/// Cards in a textual header
pub const CARD_COUNT: usize = TEXTUAL_HEADER_SIZE / CARD_WIDTH;

/// (EBCDIC, ASCII) pairs of the supported code page subset.
///
/// `|` appears twice (79 and 106); the first entry wins when encoding.
#[rustfmt::skip]
const EBCDIC_ASCII_PAIRS: &[(u8, u8)] = &[
    (64, b' '), (75, b'.'), (76, b'<'), (77, b'('), (78, b'+'), (79, b'|'),
    (80, b'&'), (90, b'!'), (91, b'$'), (92, b'*'), (93, b')'), (94, b';'),
    (96, b'-'), (97, b'/'), (106, b'|'), (107, b','), (108, b'%'), (109, b'_'),
    (110, b'>'), (111, b'?'), (121, b'`'), (122, b':'), (123, b'#'), (124, b'@'),
    (125, b'\''), (126, b'='), (127, b'"'), (129, b'a'), (130, b'b'), (131, b'c'),
    (132, b'd'), (133, b'e'), (134, b'f'), (135, b'g'), (136, b'h'), (137, b'i'),
    (145, b'j'), (146, b'k'), (147, b'l'), (148, b'm'), (149, b'n'), (150, b'o'),
    (151, b'p'), (152, b'q'), (153, b'r'), (161, b'~'), (162, b's'), (163, b't'),
    (164, b'u'), (165, b'v'), (166, b'w'), (167, b'x'), (168, b'y'), (169, b'z'),
    (192, b'{'), (193, b'A'), (194, b'B'), (195, b'C'), (196, b'D'), (197, b'E'),
    (198, b'F'), (199, b'G'), (200, b'H'), (201, b'I'), (208, b'}'), (209, b'J'),
    (210, b'K'), (211, b'L'), (212, b'M'), (213, b'N'), (214, b'O'), (215, b'P'),
    (216, b'Q'), (217, b'R'), (224, b'\\'), (226, b'S'), (227, b'T'), (228, b'U'),
    (229, b'V'), (230, b'W'), (231, b'X'), (232, b'Y'), (233, b'Z'), (240, b'0'),
    (241, b'1'), (242, b'2'), (243, b'3'), (244, b'4'), (245, b'5'), (246, b'6'),
    (247, b'7'), (248, b'8'), (249, b'9'),
];

const fn build_ebcdic_to_ascii() -> [u8; 256] {
    let mut table = [b' '; 256];
    let mut i = 0;
    while i < EBCDIC_ASCII_PAIRS.len() {
        let (ebcdic, ascii) = EBCDIC_ASCII_PAIRS[i];
        table[ebcdic as usize] = ascii;
        i += 1;
    }
    table
}

const fn build_ascii_to_ebcdic() -> [u8; 256] {
    let mut table = [b' '; 256];
    // Walk backwards so the first pair for a character wins.
    let mut i = EBCDIC_ASCII_PAIRS.len();
    while i > 0 {
        i -= 1;
        let (ebcdic, ascii) = EBCDIC_ASCII_PAIRS[i];
        table[ascii as usize] = ebcdic;
    }
    table
}

static EBCDIC_TO_ASCII: [u8; 256] = build_ebcdic_to_ascii();
static ASCII_TO_EBCDIC: [u8; 256] = build_ascii_to_ebcdic();

/// Translate one EBCDIC byte. Unmapped bytes become a space.
pub fn ascii_from_ebcdic(byte: u8) -> u8 {
    EBCDIC_TO_ASCII[byte as usize]
}

/// Translate one ASCII byte. Unmapped bytes become a space.
pub fn ebcdic_from_ascii(byte: u8) -> u8 {
    ASCII_TO_EBCDIC[byte as usize]
}

/// Guess whether `bytes` is EBCDIC text.
///
/// Counts alphanumerics under both interpretations; EBCDIC wins ties.
pub fn looks_like_ebcdic(bytes: &[u8]) -> bool {
    let ascii = bytes.iter().filter(|b| b.is_ascii_alphanumeric()).count();
    let ebcdic = bytes
        .iter()
        .filter(|&&b| ascii_from_ebcdic(b).is_ascii_alphanumeric())
        .count();
    ascii <= ebcdic
}

/// Decode a textual header into 80-column lines joined by `\n`.
///
/// Returns the text and the encoding it was detected as.
pub fn decode_textual_header(raw: &[u8]) -> (String, TextEncoding) {
    let encoding = if looks_like_ebcdic(raw) {
        TextEncoding::Ebcdic
    } else {
        TextEncoding::Ascii
    };

    let lines: Vec<String> = raw
        .chunks(CARD_WIDTH)
        .map(|card| {
            card.iter()
                .map(|&b| {
                    let c = match encoding {
                        TextEncoding::Ebcdic => ascii_from_ebcdic(b),
                        TextEncoding::Ascii => b,
                    };
                    if c.is_ascii_graphic() {
                        c as char
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect();

    (lines.join("\n"), encoding)
}

/// Lay `lines` out as a 3200-byte textual header.
///
/// Each line is padded or cut to 80 columns; missing cards are blank.
pub fn encode_textual_header<S: AsRef<str>>(
    lines: &[S],
    encoding: TextEncoding,
) -> [u8; TEXTUAL_HEADER_SIZE] {
    let mut raw = [b' '; TEXTUAL_HEADER_SIZE];

    for (card, line) in raw.chunks_mut(CARD_WIDTH).zip(lines.iter()) {
        for (slot, c) in card.iter_mut().zip(line.as_ref().bytes()) {
            *slot = if c.is_ascii_graphic() { c } else { b' ' };
        }
    }

    if encoding == TextEncoding::Ebcdic {
        for b in raw.iter_mut() {
            *b = ebcdic_from_ascii(*b);
        }
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mapped_alphabet() -> Vec<u8> {
        EBCDIC_ASCII_PAIRS.iter().map(|&(_, a)| a).collect()
    }

    #[test]
    fn test_character_round_trip() {
        for c in mapped_alphabet() {
            assert_eq!(ascii_from_ebcdic(ebcdic_from_ascii(c)), c, "{}", c as char);
        }
        assert_eq!(ebcdic_from_ascii(b'|'), 79);
        assert_eq!(ascii_from_ebcdic(106), b'|');
    }

    #[test]
    fn test_unmapped_is_space() {
        assert_eq!(ascii_from_ebcdic(0), b' ');
        assert_eq!(ascii_from_ebcdic(255), b' ');
        assert_eq!(ebcdic_from_ascii(b'^'), b' ');
        assert_eq!(ebcdic_from_ascii(b'\n'), b' ');
    }

    #[test]
    fn test_encoding_detection() {
        let ascii = b"C 1 CLIENT SEISMIC COMPANY 3D SURVEY";
        assert!(!looks_like_ebcdic(ascii));

        let ebcdic: Vec<u8> = ascii.iter().map(|&c| ebcdic_from_ascii(c)).collect();
        assert!(looks_like_ebcdic(&ebcdic));

        // No alphanumerics either way: a tie favours EBCDIC.
        assert!(looks_like_ebcdic(&[0u8; 16]));
    }

    #[test]
    fn test_textual_header_layout() {
        let lines = ["C 1 FIRST CARD", "C 2 SECOND CARD"];
        for encoding in [TextEncoding::Ascii, TextEncoding::Ebcdic] {
            let raw = encode_textual_header(&lines, encoding);
            let (text, detected) = decode_textual_header(&raw);
            assert_eq!(detected, encoding);

            let decoded: Vec<&str> = text.lines().collect();
            assert_eq!(decoded.len(), CARD_COUNT);
            assert_eq!(decoded[0].trim_end(), "C 1 FIRST CARD");
            assert_eq!(decoded[1].trim_end(), "C 2 SECOND CARD");
            assert!(decoded[2].trim().is_empty());
            assert_eq!(decoded[39].len(), CARD_WIDTH);
        }
    }

    proptest! {
        #[test]
        fn prop_unmapped_ascii_encodes_to_space(c in any::<u8>()) {
            let e = ebcdic_from_ascii(c);
            if !mapped_alphabet().contains(&c) {
                prop_assert_eq!(e, b' ');
            } else {
                prop_assert_eq!(ascii_from_ebcdic(e), c);
            }
        }
    }
}
