use super::dictionary::HashDict;
use super::params::CodingParams;
use super::tokens::Token;
use super::MIN_CODED_LEN;
use crate::error::Result;

/// Encode a single contiguous buffer into an LZSS token sequence.
///
/// The dictionary lives only for the duration of this call. Every 3-gram
/// ending at or before the current position is indexed, and entries older
/// than the search buffer are evicted so no emitted match can reference
/// beyond `search_buf_size` bytes back.
pub fn encode_block(data: &[u8], params: &CodingParams) -> Result<Vec<Token>> {
    let n = data.len();
    let mut tokens = Vec::new();

    // The dictionary holds no 3-grams yet, so the first MIN_CODED_LEN bytes
    // (or the whole buffer, if shorter) go out as literals.
    for &byte in data.iter().take(MIN_CODED_LEN) {
        tokens.push(Token::Literal(byte));
    }
    if n <= MIN_CODED_LEN {
        return Ok(tokens);
    }

    let mut dict = HashDict::new(data);
    dict.insert(0);

    let mut pos = MIN_CODED_LEN;
    let mut removed_until = 0usize;

    while pos < n {
        let next = match dict.search(pos, params) {
            Some(m) => {
                tokens.push(Token::Match {
                    offset: (pos - m.position) as u16,
                    length: m.extra_len,
                });
                pos + m.extra_len as usize + MIN_CODED_LEN
            }
            None => {
                tokens.push(Token::Literal(data[pos]));
                pos + 1
            }
        };

        // Index every 3-gram ending inside the span just consumed. The gram
        // starting at k - MIN_CODED_LEN + 1 is the newest one ending at k.
        for k in pos..next {
            let start = k + 1 - MIN_CODED_LEN;
            if start + MIN_CODED_LEN <= n {
                dict.insert(start);
            }
        }

        // Evict positions that fell out of the search buffer. The newest
        // indexed gram starts at next - MIN_CODED_LEN, so eviction never
        // targets a position that was not inserted.
        if next > params.search_buf_size {
            let remove_to = (next - params.search_buf_size - 1).min(next - MIN_CODED_LEN);
            for r in removed_until..=remove_to {
                dict.remove(r)?;
            }
            removed_until = remove_to + 1;
        }

        pos = next;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lzss::decode_tokens;

    fn params(offset_bits: u16, length_bits: u16) -> CodingParams {
        CodingParams::new(offset_bits, length_bits).unwrap()
    }

    fn decoded_total(tokens: &[Token]) -> usize {
        tokens.iter().map(Token::decoded_len).sum()
    }

    #[test]
    fn test_empty_buffer() {
        let tokens = encode_block(&[], &params(8, 4)).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_min_len_buffer_is_all_literals() {
        let tokens = encode_block(b"abc", &params(8, 4)).unwrap();
        assert_eq!(
            tokens,
            vec![Token::Literal(b'a'), Token::Literal(b'b'), Token::Literal(b'c')]
        );
    }

    #[test]
    fn test_short_tail_stays_literal() {
        // No 3-gram fits at positions 3 and 4, so the tail cannot be coded.
        let tokens = encode_block(b"AAAAA", &params(8, 4)).unwrap();
        assert_eq!(tokens, vec![Token::Literal(b'A'); 5]);
    }

    #[test]
    fn test_repeating_triplet() {
        // "aacaacaac": three literals, then one match covering the rest.
        let tokens = encode_block(&[97, 97, 99, 97, 97, 99, 97, 97, 99], &params(6, 4)).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(97),
                Token::Literal(97),
                Token::Literal(99),
                Token::Match { offset: 3, length: 3 },
            ]
        );
    }

    #[test]
    fn test_uniform_run_single_match() {
        // After the leading literals the only indexed gram starts at 0,
        // giving one overlapping match at offset 3 for the whole tail.
        let data = vec![0x41u8; 20];
        let tokens = encode_block(&data, &params(8, 5)).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(0x41),
                Token::Literal(0x41),
                Token::Literal(0x41),
                Token::Match { offset: 3, length: 14 },
            ]
        );
        assert_eq!(decoded_total(&tokens), 20);
    }

    #[test]
    fn test_match_legality() {
        let data: Vec<u8> = (0..2048u32).map(|i| (i % 7) as u8 ^ (i / 11) as u8).collect();
        let p = params(6, 4);
        let tokens = encode_block(&data, &p).unwrap();

        let mut decoded = 0usize;
        for token in &tokens {
            if let Token::Match { offset, length } = token {
                assert!(*offset > 0);
                assert!((*offset as usize) <= p.search_buf_size);
                assert!(*length <= p.max_extra_len);
                assert!((*offset as usize) <= decoded);
            }
            decoded += token.decoded_len();
        }
        assert_eq!(decoded, data.len());
    }

    #[test]
    fn test_round_trip_through_decoder() {
        let patterns: Vec<Vec<u8>> = vec![
            vec![],
            vec![42],
            b"abcdefgh".to_vec(),
            vec![0u8; 300],
            (0..=255u8).collect(),
            b"the quick brown fox ".repeat(40),
        ];
        for data in patterns {
            for (ob, lb) in [(4, 3), (8, 4), (10, 8), (15, 15)] {
                let p = params(ob, lb);
                let tokens = encode_block(&data, &p).unwrap();
                let decoded = decode_tokens(&tokens, data.len()).unwrap();
                assert_eq!(decoded, data, "offset_bits={ob} length_bits={lb}");
            }
        }
    }

    #[test]
    fn test_tiny_window_round_trip() {
        // offset_bits = 1 leaves a one-byte window; eviction must not trip
        // over grams that were never inserted.
        let data = b"abababababab".to_vec();
        let p = params(1, 4);
        let tokens = encode_block(&data, &p).unwrap();
        let decoded = decode_tokens(&tokens, data.len()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_window_slides_past_buffer() {
        // Buffer much larger than the window forces steady eviction.
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 253) as u8).collect();
        let p = params(5, 4); // 31-byte window
        let tokens = encode_block(&data, &p).unwrap();
        let decoded = decode_tokens(&tokens, data.len()).unwrap();
        assert_eq!(decoded, data);
    }
}
