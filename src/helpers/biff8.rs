//! Microsoft Office Binary Interchange File Format (BIFF8)
//! Record reader for the `Workbook` stream of Excel 97-2003 files.
//! Records longer than 8224 bytes continue in CONTINUE records; the reader
//! stitches them together so callers see one logical record.

use crate::error::AdmissionCalendarError;
use crate::helpers::bytes::LeBytes;
use thiserror::Error;

const CONTINUE: u16 = 60;

#[derive(Error, Debug)]
pub enum Biff8Error {
    #[error("Fewer than {0} bytes remaining in record")]
    NoEnoughDataError(usize),
}

pub(crate) struct Biff8Reader {
    buffer: Vec<u8>,
    pointer: usize,
    /// Byte ranges of the current record and its continuations
    chunks: Vec<(usize, usize)>,
    index: usize,
    offset: usize,
}

impl Biff8Reader {
    pub(crate) fn new(data: Vec<u8>) -> Biff8Reader {
        Biff8Reader {
            buffer: data,
            pointer: 0,
            chunks: Vec::new(),
            index: 0,
            offset: 0,
        }
    }

    /// Advances to the next record and returns its type
    pub(crate) fn next(&mut self) -> Result<Option<u16>, AdmissionCalendarError> {
        let Some((kind, lower, upper)) = self.record_at(self.pointer) else {
            return Ok(None);
        };
        self.index = 0;
        self.offset = 0;
        self.pointer = upper;
        self.chunks.clear();
        self.chunks.push((lower, upper));
        while let Some((CONTINUE, lower, upper)) = self.record_at(self.pointer) {
            self.pointer = upper;
            self.chunks.push((lower, upper));
        }
        Ok(Some(kind))
    }

    /// Record header at `pointer`: type plus the clamped byte range of its body
    fn record_at(&self, pointer: usize) -> Option<(u16, usize, usize)> {
        let kind = self.buffer.u16_at(pointer)?;
        let size = self.buffer.u16_at(pointer + 2)? as usize;
        let lower = pointer + 4;
        let upper = (lower + size).min(self.buffer.len());
        Some((kind, lower, upper))
    }

    /// Jumps to an absolute stream position (e.g. a BoundSheet8 offset)
    pub(crate) fn goto(&mut self, pointer: usize) {
        self.pointer = pointer;
        self.chunks.clear();
    }

    fn read_exact(&mut self, length: usize) -> Result<&[u8], AdmissionCalendarError> {
        let (lower, upper) = self.take(length);
        if upper - lower == length {
            Ok(&self.buffer[lower..upper])
        } else {
            Err(Biff8Error::NoEnoughDataError(length))?
        }
    }

    /// Consumes up to `length` bytes from the current chunk and returns their range
    fn take(&mut self, length: usize) -> (usize, usize) {
        if let Some((lower, upper)) = self.chunks.get(self.index).copied() {
            let source = upper.min(lower + self.offset);
            let target = upper.min(source + length);
            if source < upper {
                if target == upper {
                    self.index += 1;
                    self.offset = 0;
                } else {
                    self.offset += target - source;
                }
                return (source, target);
            }
        }
        (0, 0)
    }

    /// Skips `length` bytes, crossing CONTINUE boundaries if needed
    pub(crate) fn skip(&mut self, length: usize) -> Result<(), AdmissionCalendarError> {
        let mut remaining = length;
        while remaining > 0 {
            let (lower, upper) = self.take(remaining);
            if lower == upper {
                Err(Biff8Error::NoEnoughDataError(remaining))?
            }
            remaining -= upper - lower;
        }
        Ok(())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, AdmissionCalendarError> {
        self.read_exact(1).map(|data| data[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, AdmissionCalendarError> {
        let bytes = self.read_exact(2)?;
        Ok(bytes.u16_at(0).ok_or(Biff8Error::NoEnoughDataError(2))?)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, AdmissionCalendarError> {
        let bytes = self.read_exact(4)?;
        Ok(bytes.u32_at(0).ok_or(Biff8Error::NoEnoughDataError(4))?)
    }

    pub(crate) fn read_usize(&mut self) -> Result<usize, AdmissionCalendarError> {
        Ok(self.read_u32()? as usize)
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64, AdmissionCalendarError> {
        let bytes = self.read_exact(8)?;
        Ok(bytes.u64_at(0).ok_or(Biff8Error::NoEnoughDataError(8))?)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64, AdmissionCalendarError> {
        let bytes = self.read_exact(8)?;
        Ok(bytes.f64_at(0).ok_or(Biff8Error::NoEnoughDataError(8))?)
    }

    /// Reads the last u16 of the current record (MulRk keeps its last column there)
    pub(crate) fn last_u16(&self) -> Result<u16, AdmissionCalendarError> {
        let (lower, upper) = self.chunks.last().copied().ok_or(Biff8Error::NoEnoughDataError(2))?;
        if upper < lower + 2 {
            Err(Biff8Error::NoEnoughDataError(2))?
        }
        Ok(self.buffer.u16_at(upper - 2).ok_or(Biff8Error::NoEnoughDataError(2))?)
    }

    /// Decodes an RK value: a 30-bit integer or the high 30 bits of an IEEE double,
    /// optionally divided by 100
    pub(crate) fn read_rk_number(&mut self) -> Result<String, AdmissionCalendarError> {
        let raw = self.read_u32()?;
        let is_divided = (raw & 0x01) != 0;
        let is_integer = (raw & 0x02) != 0;
        let value = if is_integer {
            ((raw as i32) >> 2) as f64
        } else {
            f64::from_bits(((raw & 0xFFFF_FFFC) as u64) << 32)
        };
        let value = if is_divided { value / 100.0 } else { value };
        Ok(value.to_string())
    }

    /// ShortXLUnicodeString: 1-byte character count
    pub(crate) fn read_short_xl_unicode_string(&mut self) -> Result<String, AdmissionCalendarError> {
        let chars = self.read_u8()? as usize;
        self.read_plain_string(chars)
    }

    /// XLUnicodeString: 2-byte character count
    pub(crate) fn read_xl_unicode_string(&mut self) -> Result<String, AdmissionCalendarError> {
        let chars = self.read_u16()? as usize;
        self.read_plain_string(chars)
    }

    fn read_plain_string(&mut self, chars: usize) -> Result<String, AdmissionCalendarError> {
        let is_wide = (self.read_u8()? & 0x1) != 0;
        let mut string = String::new();
        if self.read_chars_into(chars, is_wide, &mut string) < chars {
            Err(Biff8Error::NoEnoughDataError(chars))?
        }
        Ok(string)
    }

    /// XLUnicodeRichExtendedString as stored in the SST. The character data may
    /// continue in the next CONTINUE record, which restarts with its own flags byte;
    /// formatting runs and phonetic data follow the characters and are skipped.
    pub(crate) fn read_xl_unicode_rich_extended_string(&mut self) -> Result<String, AdmissionCalendarError> {
        let mut remaining = self.read_u16()? as usize;
        let flag = self.read_u8()?;
        let rich_runs = if (flag & 0x8) != 0 { self.read_u16()? as usize } else { 0 };
        let phonetic_size = if (flag & 0x4) != 0 { self.read_usize()? } else { 0 };
        let mut is_wide = (flag & 0x1) != 0;
        let mut string = String::new();
        while remaining > 0 {
            if self.offset == 0 && self.index > 0 {
                is_wide = (self.read_u8()? & 0x1) != 0;
            }
            let read = self.read_chars_into(remaining, is_wide, &mut string);
            if read == 0 {
                Err(Biff8Error::NoEnoughDataError(remaining))?
            }
            remaining -= read;
        }
        self.skip(4 * rich_runs)?;
        self.skip(phonetic_size)?;
        Ok(string)
    }

    /// Decodes up to `chars` characters from the current chunk; returns how many were read
    fn read_chars_into(&mut self, chars: usize, is_wide: bool, content: &mut String) -> usize {
        let expected = if is_wide { chars * 2 } else { chars };
        let (lower, upper) = self.take(expected);
        let bytes = &self.buffer[lower..upper];
        if is_wide {
            let (string, _, _) = encoding_rs::UTF_16LE.decode(bytes);
            content.push_str(&string);
            bytes.len() / 2
        } else {
            // Compressed strings hold the low byte of each UTF-16 code unit
            content.extend(bytes.iter().map(|byte| char::from(*byte)));
            bytes.len()
        }
    }
}

#[macro_export]
macro_rules! match_biff8_record {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(kind) = $reader.next()? {
            match kind {
                $($arms)*
                _ => (),
            }
        }
    };
}
