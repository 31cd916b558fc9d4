#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use markstream::{
    InlineEmphasisMode, ParseEvent, ParserOptions, StreamingParser, TableOutputMode,
    check_well_formed,
};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Markdown fragments the mutator stitches together. Plain libFuzzer
/// mutations rarely produce a table separator or a matching fence.
static MARKDOWN_TABLE: &[&str] = &[
    "# ",
    "### ",
    "\n",
    "\n\n",
    " ",
    "\t",
    "- ",
    "+ ",
    "3. ",
    "> ",
    "| a | b |\n",
    "|---|:-:|\n",
    "```",
    "~~~~",
    "$$",
    "**",
    "*",
    "~~",
    "`",
    "[",
    "](",
    ")",
    "---",
    "\\|",
    "é",
    "\u{2028}",
];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07); // 3 bits

        // 2) split-seed
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;

        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;
            let written = append_markdown(&mut data[prefix..], limit);
            if written == 0 {
                break;
            }
            prefix += written;
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒N markdown fragments (N chosen randomly) to `buf`, but never
/// exceed `limit`. Returns the number of bytes written.
fn append_markdown(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n_fragments = rng.random_range(1..=8);
        let mut written = 0;

        for _ in 0..n_fragments {
            let fragment = if rng.random_bool(0.25) {
                Word::random(rng).0
            } else {
                MARKDOWN_TABLE[rng.random_range(0..MARKDOWN_TABLE.len())].to_owned()
            };

            // Stop if this fragment would overflow the caller’s slice.
            if written + fragment.len() > limit {
                break;
            }

            buf[written..written + fragment.len()].copy_from_slice(fragment.as_bytes());
            written += fragment.len();
        }
        written
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// A run of ASCII letters, occasionally longer than the delta chunk size.
#[derive(Debug)]
struct Word(String);

impl Word {
    fn random(rng: &mut SmallRng) -> Self {
        let bytes: Vec<u8> = (0..rng.random_range(1..64)).map(|_| rng.random()).collect();
        Word::arbitrary(&mut arbitrary::Unstructured::new(&bytes)).unwrap_or(Word("word".into()))
    }
}

impl<'a> Arbitrary<'a> for Word {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(1..=30)?;
        let mut word = String::with_capacity(len);
        for _ in 0..len {
            word.push(char::from(b'a' + u.int_in_range(0..=25)?));
        }
        Ok(Word(word))
    }
}

fn collect(chunks: &[&str], options: ParserOptions) -> Vec<ParseEvent> {
    let mut parser = StreamingParser::new(options);
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(parser.feed(chunk));
        assert_eq!(parser.queued_events(), 0, "feed iterator left events behind");
    }
    events.extend(parser.finish());
    events
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as u64;
    let data = &data[5..];

    if data.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(data).into_owned();

    let options = ParserOptions {
        max_delta_chunk_size: if flags & 1 != 0 { 3 } else { 20 },
        inline_emphasis: if flags & 2 != 0 {
            InlineEmphasisMode::Preserve
        } else {
            InlineEmphasisMode::Strip
        },
        table_output: if flags & 4 != 0 {
            TableOutputMode::Structured
        } else {
            TableOutputMode::Text
        },
    };

    // Use the random number we chose to split the input into chunks:
    let chunks = split_into_safe_chunks(&text, split_seed);
    let whole = collect(&[text.as_str()], options);
    let split = collect(&chunks, options);

    if let Err(violation) = check_well_formed(&whole) {
        panic!("malformed event stream for {text:?}: {violation}");
    }
    assert_eq!(whole, split, "events depend on fragmentation of {text:?}");
}

fuzz_target!(|data: &[u8]| parser(data));

/// Split a UTF-8 `&str` into boundary-safe chunks of pseudo-random sizes
/// derived from `split_seed`.
///
/// * Each chunk is at least one byte.
/// * Every slice ends on a valid UTF-8 boundary, so it can’t panic.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut rng = SmallRng::seed_from_u64(split_seed);
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = text.len();

    while start < len {
        let remaining = len - start;
        let mut size = rng.random_range(1..=remaining.min(16));

        // Bump `size` forward until it lands on a char boundary
        // (or hits the end of the string, which is always a boundary).
        while start + size < len && !text.is_char_boundary(start + size) {
            size += 1;
        }

        chunks.push(&text[start..start + size]);
        start += size;
    }

    chunks
}
