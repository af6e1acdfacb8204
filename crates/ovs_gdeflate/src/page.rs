//! Lane interleaved GDeflate pages.
//!
//! A page is a DEFLATE stream whose bits are split over [`NUM_LANES`] lanes. Each lane reads its
//! own little endian bit buffer and refills it 32 bits at a time from the page. Those words are
//! laid out in the order the lanes ask for them.
//!
//! - Block headers, stored lengths and dynamic table descriptions are read from lane 0.
//! - The literals and matches of a Huffman block go to the lanes round robin, starting with lane
//!   0 in every block; a match keeps its length and distance in one lane. The end of block code
//!   is read by the lane whose turn it is.
//! - The bytes of a stored block go round robin as well, 8 bits each, with no alignment and no
//!   length complement.
//! - A lane refills only when it holds fewer bits than the next read needs.

use crate::error::{Error, Result};

/// Number of bit lanes of a page
pub const NUM_LANES: usize = 32;

const MAX_CODE_LEN: u32 = 15;
const MAX_PRECODE_LEN: u32 = 7;

const NUM_LITLEN_SYMBOLS: usize = 286;
const NUM_DISTANCE_SYMBOLS: usize = 30;
const END_OF_BLOCK: u16 = 256;

const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
const LENGTH_EXTRA: [u32; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const DISTANCE_EXTRA: [u32; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order in which precode lengths are stored
const PRECODE_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

fn bad_page(reason: impl Into<String>) -> Error {
    Error::InvalidTileStream(reason.into())
}

/// Bit buffers of all lanes over one page.
struct Lanes<'a> {
    page: &'a [u8],
    next: usize,
    bitbuf: [u64; NUM_LANES],
    bitsleft: [u32; NUM_LANES],
}

impl<'a> Lanes<'a> {
    fn new(page: &'a [u8]) -> Self {
        Lanes {
            page,
            next: 0,
            bitbuf: [0; NUM_LANES],
            bitsleft: [0; NUM_LANES],
        }
    }

    /// Make sure `lane` holds at least `count` bits, `count` is at most 32.
    fn ensure(&mut self, lane: usize, count: u32) -> Result<()> {
        if self.bitsleft[lane] >= count {
            return Ok(());
        }

        let word = match self.page.get(self.next..self.next + 4) {
            Some(&[a, b, c, d]) => u32::from_le_bytes([a, b, c, d]),
            _ => {
                return Err(bad_page(format!(
                    "page ends at byte {} while lane {lane} needs {count} bits",
                    self.page.len()
                )))
            }
        };
        self.next += 4;
        self.bitbuf[lane] |= u64::from(word) << self.bitsleft[lane];
        self.bitsleft[lane] += 32;
        Ok(())
    }

    fn consume(&mut self, lane: usize, count: u32) {
        self.bitbuf[lane] >>= count;
        self.bitsleft[lane] -= count;
    }

    fn bits(&mut self, lane: usize, count: u32) -> Result<u32> {
        self.ensure(lane, count)?;
        let value = (self.bitbuf[lane] & ((1u64 << count) - 1)) as u32;
        self.consume(lane, count);
        Ok(value)
    }
}

/// Canonical Huffman code, decoded one bit at a time.
struct Huffman {
    max_len: u32,
    counts: [u16; MAX_CODE_LEN as usize + 1],
    symbols: Vec<u16>,
}

impl Huffman {
    fn new(lengths: &[u8], max_len: u32) -> Result<Self> {
        let mut counts = [0u16; MAX_CODE_LEN as usize + 1];
        for &len in lengths {
            if u32::from(len) > max_len {
                return Err(bad_page(format!("code length {len} exceeds {max_len}")));
            }
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        let mut left = 1i32;
        for &count in &counts[1..] {
            left = (left << 1) - i32::from(count);
            if left < 0 {
                return Err(bad_page("over-subscribed Huffman code"));
            }
        }

        let mut offsets = [0u16; MAX_CODE_LEN as usize + 1];
        for len in 1..MAX_CODE_LEN as usize {
            offsets[len + 1] = offsets[len] + counts[len];
        }
        let mut symbols = vec![0u16; lengths.len()];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                symbols[offsets[len as usize] as usize] = symbol as u16;
                offsets[len as usize] += 1;
            }
        }

        Ok(Huffman {
            max_len,
            counts,
            symbols,
        })
    }

    fn decode(&self, lanes: &mut Lanes<'_>, lane: usize) -> Result<u16> {
        lanes.ensure(lane, self.max_len)?;
        let bits = lanes.bitbuf[lane];

        let (mut code, mut first, mut index) = (0i32, 0i32, 0i32);
        for len in 1..=self.max_len {
            code |= ((bits >> (len - 1)) & 1) as i32;
            let count = i32::from(self.counts[len as usize]);
            if code - first < count {
                lanes.consume(lane, len);
                return Ok(self.symbols[(index + code - first) as usize]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(bad_page(format!("invalid code in lane {lane}")))
    }
}

fn fixed_codes() -> Result<(Huffman, Huffman)> {
    let mut lengths = [0u8; 288];
    lengths[..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..].fill(8);

    Ok((
        Huffman::new(&lengths, MAX_CODE_LEN)?,
        Huffman::new(&[5; NUM_DISTANCE_SYMBOLS], MAX_CODE_LEN)?,
    ))
}

fn dynamic_codes(lanes: &mut Lanes<'_>) -> Result<(Huffman, Huffman)> {
    let num_litlen = lanes.bits(0, 5)? as usize + 257;
    let num_distance = lanes.bits(0, 5)? as usize + 1;
    let num_precode = lanes.bits(0, 4)? as usize + 4;
    if num_litlen > NUM_LITLEN_SYMBOLS || num_distance > NUM_DISTANCE_SYMBOLS {
        return Err(bad_page(format!(
            "{num_litlen} literal and {num_distance} distance codes"
        )));
    }

    let mut precode_lengths = [0u8; 19];
    for &symbol in &PRECODE_ORDER[..num_precode] {
        precode_lengths[symbol] = lanes.bits(0, 3)? as u8;
    }
    let precode = Huffman::new(&precode_lengths, MAX_PRECODE_LEN)?;

    let mut lengths = vec![0u8; num_litlen + num_distance];
    let mut i = 0;
    while i < lengths.len() {
        let (value, repeat) = match precode.decode(lanes, 0)? {
            len @ 0..=15 => (len as u8, 1),
            16 => {
                let previous = match i {
                    0 => return Err(bad_page("repeat before the first code length")),
                    _ => lengths[i - 1],
                };
                (previous, 3 + lanes.bits(0, 2)? as usize)
            }
            17 => (0, 3 + lanes.bits(0, 3)? as usize),
            _ => (0, 11 + lanes.bits(0, 7)? as usize),
        };
        if i + repeat > lengths.len() {
            return Err(bad_page("code lengths overrun the table"));
        }
        lengths[i..i + repeat].fill(value);
        i += repeat;
    }

    if lengths[END_OF_BLOCK as usize] == 0 {
        return Err(bad_page("block has no end of block code"));
    }

    Ok((
        Huffman::new(&lengths[..num_litlen], MAX_CODE_LEN)?,
        Huffman::new(&lengths[num_litlen..], MAX_CODE_LEN)?,
    ))
}

fn stored_block(lanes: &mut Lanes<'_>, output: &mut [u8], out: &mut usize) -> Result<()> {
    let len = lanes.bits(0, 16)? as usize;
    if *out + len > output.len() {
        return Err(bad_page(format!(
            "stored block of {len} bytes does not fit in {} bytes of output",
            output.len()
        )));
    }

    for i in 0..len {
        output[*out] = lanes.bits(i % NUM_LANES, 8)? as u8;
        *out += 1;
    }
    Ok(())
}

fn huffman_block(
    lanes: &mut Lanes<'_>,
    (litlen, distance): &(Huffman, Huffman),
    output: &mut [u8],
    out: &mut usize,
) -> Result<()> {
    let mut lane = 0;
    loop {
        let symbol = litlen.decode(lanes, lane)?;
        if symbol < END_OF_BLOCK {
            if *out == output.len() {
                return Err(bad_page("output is full"));
            }
            output[*out] = symbol as u8;
            *out += 1;
        } else if symbol == END_OF_BLOCK {
            return Ok(());
        } else {
            let index = usize::from(symbol - 257);
            let base = LENGTH_BASE
                .get(index)
                .ok_or_else(|| bad_page(format!("invalid length symbol {symbol}")))?;
            let length = usize::from(*base) + lanes.bits(lane, LENGTH_EXTRA[index])? as usize;

            let index = usize::from(distance.decode(lanes, lane)?);
            let base = DISTANCE_BASE
                .get(index)
                .ok_or_else(|| bad_page(format!("invalid distance symbol {index}")))?;
            let dist = usize::from(*base) + lanes.bits(lane, DISTANCE_EXTRA[index])? as usize;

            if dist > *out {
                return Err(bad_page(format!(
                    "match reaches {dist} bytes back from byte {}",
                    *out
                )));
            }
            if *out + length > output.len() {
                return Err(bad_page("output is full"));
            }
            for _ in 0..length {
                output[*out] = output[*out - dist];
                *out += 1;
            }
        }
        lane = (lane + 1) % NUM_LANES;
    }
}

/// Decode one page into `output`, returning the number of bytes written.
pub fn decode_page(page: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut lanes = Lanes::new(page);
    let mut out = 0;

    loop {
        lanes.ensure(0, 1 + 2 + 5 + 5 + 4)?;
        let last = lanes.bits(0, 1)? == 1;
        match lanes.bits(0, 2)? {
            0 => stored_block(&mut lanes, output, &mut out)?,
            1 => huffman_block(&mut lanes, &fixed_codes()?, output, &mut out)?,
            2 => {
                let codes = dynamic_codes(&mut lanes)?;
                huffman_block(&mut lanes, &codes, output, &mut out)?;
            }
            _ => return Err(bad_page("reserved block type")),
        }

        if last {
            return Ok(out);
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::decode_page;
    use crate::error::{Error, Result};

    const TEXT: &[u8] =
        b"GDeflate pages spread their symbols over thirty two lanes: lanes, lanes, lanes and more lanes.";

    #[test]
    fn stored_page() -> Result<()> {
        #[rustfmt::skip]
        let page = [
            0xB9, 0x01, 0x98, 0x03, 0x74, 0x73, 0x00, 0x00, 0x6F, 0x70, 0x00, 0x00, 0x72, 0x72, 0x00, 0x00,
            0x65, 0x65, 0x00, 0x00, 0x64, 0x61, 0x00, 0x00, 0x20, 0x64, 0x00, 0x00, 0x62, 0x20, 0x00, 0x00,
            0x79, 0x6F, 0x00, 0x00, 0x74, 0x76, 0x00, 0x00, 0x65, 0x65, 0x00, 0x00, 0x73, 0x72, 0x00, 0x00,
            0x20, 0x20, 0x00, 0x00, 0x6F, 0x65, 0x00, 0x00, 0x66, 0x76, 0x00, 0x00, 0x20, 0x65, 0x00, 0x00,
            0x61, 0x72, 0x00, 0x00, 0x20, 0x79, 0x00, 0x00, 0x47, 0x20, 0x00, 0x00, 0x44, 0x6C, 0x00, 0x00,
            0x65, 0x61, 0x00, 0x00, 0x66, 0x6E, 0x00, 0x00, 0x6C, 0x65, 0x00, 0x00, 0x61, 0x00, 0x00, 0x00,
            0x74, 0x00, 0x00, 0x00, 0x65, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x70, 0x00, 0x00, 0x00,
            0x61, 0x00, 0x00, 0x00, 0x67, 0x00, 0x00, 0x00, 0x65, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
        ];

        let mut output = [0u8; 64];
        let written = decode_page(&page, &mut output)?;
        assert_eq!(
            &output[..written],
            &b"stored bytes of a GDeflate page, spread over every lane"[..]
        );
        Ok(())
    }

    #[test]
    fn fixed_codes() -> Result<()> {
        #[rustfmt::skip]
        let page = [
            0x73, 0xCF, 0xCF, 0x05, 0x2E, 0x39, 0xF9, 0x00, 0xA9, 0xC5, 0x45, 0x00, 0x69, 0x0A, 0xA9, 0x00,
            0x39, 0xF9, 0x10, 0x35, 0x89, 0x65, 0x7A, 0x00, 0x25, 0xA9, 0x00, 0x00, 0xA9, 0x45, 0x00, 0x00,
            0x0A, 0x40, 0x21, 0x00, 0x05, 0x99, 0x00, 0x00, 0x89, 0x45, 0x00, 0x00, 0xE9, 0x25, 0x00, 0x00,
            0xA9, 0x95, 0x00, 0x00, 0xC5, 0x0A, 0x00, 0x00, 0x0A, 0x25, 0x00, 0x00, 0xC5, 0xE5, 0x00, 0x00,
            0x05, 0xF9, 0x00, 0x00, 0x45, 0x0A, 0x00, 0x00, 0xA9, 0x39, 0x00, 0x00, 0x89, 0x89, 0x00, 0x00,
            0x29, 0x79, 0x00, 0x00, 0x0A, 0xA9, 0x00, 0x00, 0x25, 0xC5, 0x00, 0x00, 0x19, 0x56, 0x00, 0x00,
            0xA9, 0x10, 0x0A, 0x00, 0x99, 0x3A, 0x00, 0x00, 0x45, 0x28, 0x14, 0x00, 0x0A, 0x0A, 0x00, 0x00,
            0xC5, 0x89, 0x00, 0x00, 0x95, 0x79, 0x00, 0x00, 0xB9, 0x29, 0x00, 0x00, 0x49, 0x0A, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let mut output = [0u8; 128];
        let written = decode_page(&page, &mut output)?;
        assert_eq!(&output[..written], TEXT);
        Ok(())
    }

    #[test]
    fn dynamic_codes() -> Result<()> {
        #[rustfmt::skip]
        let page = [
            0x55, 0xCA, 0xCB, 0x09, 0x80, 0x30, 0x10, 0x45, 0xD1, 0x56, 0x5E, 0x01, 0x62, 0x01, 0xAE, 0x05,
            0xEB, 0x18, 0xC9, 0x53, 0x03, 0xF9, 0x31, 0x33, 0x28, 0xE9, 0x5E, 0x21, 0x2B, 0x57, 0x07, 0x2E,
            0x77, 0xAB, 0x19, 0x00, 0x6B, 0xAA, 0x00, 0x00, 0x34, 0x05, 0x00, 0x00, 0x07, 0x08, 0x00, 0x00,
            0xA9, 0x8E, 0x07, 0x00, 0x72, 0xCF, 0x00, 0x00, 0xCE, 0x17, 0x00, 0x00, 0x54, 0x00, 0x00, 0x00,
            0xF8, 0x12, 0x00, 0x00, 0x2D, 0x02, 0x00, 0x00, 0xA2, 0x00, 0x00, 0x00, 0xA7, 0x03, 0x00, 0x00,
            0xEC, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x70, 0x00, 0x00, 0x00, 0xF6, 0x00, 0x00, 0x00,
            0xAD, 0x02, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x4C, 0x00, 0x00, 0x00, 0x22, 0x00, 0x00, 0x00,
            0xA1, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x6E, 0x00, 0x00, 0x00, 0xD7, 0x02, 0x00, 0x00,
            0x1C, 0x00, 0x00, 0x00, 0x71, 0x02, 0x00, 0x00, 0xFA, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x26, 0x00, 0x00, 0x00, 0xBD, 0x00, 0x00, 0x00, 0x39, 0x00, 0x00, 0x00, 0x3B, 0x00, 0x00, 0x00,
        ];

        let mut output = [0u8; 128];
        let written = decode_page(&page, &mut output)?;
        assert_eq!(&output[..written], TEXT);

        // one byte short of the text
        assert!(matches!(
            decode_page(&page, &mut output[..TEXT.len() - 1]),
            Err(Error::InvalidTileStream(_))
        ));
        // last word of a lane missing
        assert!(matches!(
            decode_page(&page[..page.len() - 4], &mut output),
            Err(Error::InvalidTileStream(_))
        ));
        Ok(())
    }

    #[test]
    fn reserved_block_type() {
        let mut output = [0u8; 16];
        assert!(matches!(
            decode_page(&[0x07, 0x00, 0x00, 0x00], &mut output),
            Err(Error::InvalidTileStream(_))
        ));
    }
}
