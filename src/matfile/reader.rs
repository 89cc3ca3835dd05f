//! MAT v5 data-element decoding
//!
//! Layout reference: MATLAB "MAT-File Format" (level 5). A file is a
//! 128-byte header followed by tagged data elements; each variable is one
//! `miMATRIX` element, optionally wrapped in a zlib-compressed
//! `miCOMPRESSED` element.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;
use log::debug;

use super::{CellArray, CharArray, MatClass, MatError, MatValue, NumericArray, StructArray};

/// Length of the descriptive header
pub(crate) const HEADER_LEN: usize = 128;
/// Length of the free-text part of the header
const HEADER_TEXT_LEN: usize = 116;
/// Version word of a level-5 file
const VERSION_5: u16 = 0x0100;

// Data element types
const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;
const MI_UTF8: u32 = 16;
const MI_UTF16: u32 = 17;
const MI_UTF32: u32 = 18;

// Array flag bits
const FLAG_COMPLEX: u32 = 0x0800;
const FLAG_LOGICAL: u32 = 0x0200;

/// Byte order declared by the header's endian indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endian {
    Little,
    Big,
}

impl Endian {
    fn u16(self, bytes: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(bytes),
            Endian::Big => BigEndian::read_u16(bytes),
        }
    }

    fn u32(self, bytes: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        }
    }
}

/// Decoded header
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub text: String,
    pub endian: Endian,
}

pub(crate) fn read_header(bytes: &[u8]) -> Result<Header, MatError> {
    if bytes.len() < HEADER_LEN {
        return Err(MatError::NotMatFile(format!(
            "file is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let text = String::from_utf8_lossy(&bytes[..HEADER_TEXT_LEN])
        .trim_end_matches(['\0', ' '])
        .to_string();
    if !text.starts_with("MATLAB") {
        return Err(MatError::NotMatFile("missing MATLAB header text".to_string()));
    }

    let endian = match &bytes[126..128] {
        b"IM" => Endian::Little,
        b"MI" => Endian::Big,
        other => {
            return Err(MatError::NotMatFile(format!(
                "invalid endian indicator {:?}",
                other
            )))
        }
    };

    let version = endian.u16(&bytes[124..126]);
    if version != VERSION_5 {
        return Err(MatError::UnsupportedVersion(version));
    }

    Ok(Header { text, endian })
}

/// Read every top-level variable following the header
pub(crate) fn read_variables(
    bytes: &[u8],
    endian: Endian,
) -> Result<Vec<(String, MatValue)>, MatError> {
    let mut cursor = ElementCursor::new(&bytes[HEADER_LEN..], endian);
    let mut variables = Vec::new();

    // Anything shorter than a tag is trailing padding
    while cursor.remaining() >= 8 {
        let (data_type, payload) = cursor.read_element()?;
        match data_type {
            MI_MATRIX => variables.push(parse_matrix(payload, endian)?),
            MI_COMPRESSED => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(payload).read_to_end(&mut inflated)?;
                let mut inner = ElementCursor::new(&inflated, endian);
                let (inner_type, inner_payload) = inner.read_element()?;
                if inner_type != MI_MATRIX {
                    return Err(MatError::Corrupt(format!(
                        "compressed element holds type {} instead of a matrix",
                        inner_type
                    )));
                }
                variables.push(parse_matrix(inner_payload, endian)?);
            }
            other => debug!("Skipping top-level data element of type {}", other),
        }
    }

    Ok(variables)
}

/// Sequential reader over tagged data elements
struct ElementCursor<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ElementCursor<'a> {
    fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], MatError> {
        if n > self.remaining() {
            return Err(MatError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read one tagged element, returning its type and payload.
    ///
    /// Handles the 4-byte "small element" form and skips the padding that
    /// aligns regular elements to 8 bytes.
    fn read_element(&mut self) -> Result<(u32, &'a [u8]), MatError> {
        let first = self.endian.u32(self.take(4)?);

        if first >> 16 != 0 {
            let data_type = first & 0xFFFF;
            let n = (first >> 16) as usize;
            let slot = self.take(4)?;
            if n > 4 {
                return Err(MatError::Corrupt(format!(
                    "small element claims {} bytes",
                    n
                )));
            }
            return Ok((data_type, &slot[..n]));
        }

        let n = self.endian.u32(self.take(4)?) as usize;
        let payload = self.take(n)?;
        if first != MI_COMPRESSED {
            let padding = (8 - n % 8) % 8;
            self.pos += padding.min(self.remaining());
        }
        Ok((first, payload))
    }

    fn read_numbers(&mut self) -> Result<Vec<f64>, MatError> {
        let (data_type, payload) = self.read_element()?;
        decode_numbers(data_type, payload, self.endian)
    }
}

/// Decode one `miMATRIX` payload into a named value
fn parse_matrix(payload: &[u8], endian: Endian) -> Result<(String, MatValue), MatError> {
    // An empty element stands for an empty double array, e.g. `[]` in a cell
    if payload.is_empty() {
        return Ok((
            String::new(),
            MatValue::Numeric(NumericArray {
                class: MatClass::Double,
                dims: vec![0, 0],
                real: Vec::new(),
                imag: None,
            }),
        ));
    }

    let mut cursor = ElementCursor::new(payload, endian);

    let (_, flags) = cursor.read_element()?;
    if flags.len() < 4 {
        return Err(MatError::Corrupt("array flags too short".to_string()));
    }
    let flags = endian.u32(&flags[..4]);
    let class_code = (flags & 0xFF) as u8;

    let dims = cursor
        .read_numbers()?
        .into_iter()
        .map(|d| {
            if d < 0.0 {
                Err(MatError::Corrupt(format!("negative dimension {}", d)))
            } else {
                Ok(d as usize)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d.max(1)))
        .is_none()
    {
        return Err(MatError::Corrupt(format!("dimensions {:?} overflow", dims)));
    }
    let count: usize = dims.iter().product();

    let (_, name) = cursor.read_element()?;
    let name = String::from_utf8_lossy(name).into_owned();

    let class = MatClass::from_code(class_code).ok_or(MatError::UnsupportedClass(class_code))?;

    let value = match class {
        MatClass::Cell => {
            let cells = (0..count)
                .map(|_| read_child(&mut cursor, endian))
                .collect::<Result<Vec<_>, _>>()?;
            MatValue::Cell(CellArray { dims, cells })
        }
        MatClass::Struct => {
            let name_len = cursor
                .read_numbers()?
                .first()
                .copied()
                .unwrap_or(0.0) as usize;
            let (_, names) = cursor.read_element()?;
            let field_names: Vec<String> = if name_len == 0 {
                Vec::new()
            } else {
                names
                    .chunks(name_len)
                    .map(|chunk| {
                        String::from_utf8_lossy(chunk)
                            .trim_end_matches('\0')
                            .to_string()
                    })
                    .filter(|field| !field.is_empty())
                    .collect()
            };
            let value_count = count.checked_mul(field_names.len()).ok_or_else(|| {
                MatError::Corrupt(format!(
                    "struct '{}' with {} fields overflows dimensions {:?}",
                    name,
                    field_names.len(),
                    dims
                ))
            })?;
            let values = (0..value_count)
                .map(|_| read_child(&mut cursor, endian))
                .collect::<Result<Vec<_>, _>>()?;
            MatValue::Struct(StructArray {
                dims,
                field_names,
                values,
            })
        }
        MatClass::Char => {
            let (data_type, data) = cursor.read_element()?;
            MatValue::Char(CharArray {
                dims,
                chars: decode_chars(data_type, data, endian)?,
            })
        }
        numeric => {
            let real = cursor.read_numbers()?;
            if real.len() != count {
                return Err(MatError::Corrupt(format!(
                    "array '{}' has {} values for dimensions {:?}",
                    name,
                    real.len(),
                    dims
                )));
            }
            let imag = if flags & FLAG_COMPLEX != 0 {
                let imag = cursor.read_numbers()?;
                if imag.len() != count {
                    return Err(MatError::Corrupt(format!(
                        "array '{}' has {} imaginary values for dimensions {:?}",
                        name,
                        imag.len(),
                        dims
                    )));
                }
                Some(imag)
            } else {
                None
            };
            let class = if flags & FLAG_LOGICAL != 0 {
                MatClass::Logical
            } else {
                numeric
            };
            MatValue::Numeric(NumericArray {
                class,
                dims,
                real,
                imag,
            })
        }
    };

    Ok((name, value))
}

/// Cell contents and struct fields are nested `miMATRIX` elements
fn read_child(cursor: &mut ElementCursor<'_>, endian: Endian) -> Result<MatValue, MatError> {
    let (data_type, payload) = cursor.read_element()?;
    if data_type != MI_MATRIX {
        return Err(MatError::Corrupt(format!(
            "expected nested matrix, found type {}",
            data_type
        )));
    }
    Ok(parse_matrix(payload, endian)?.1)
}

fn decode_numbers(data_type: u32, payload: &[u8], endian: Endian) -> Result<Vec<f64>, MatError> {
    match endian {
        Endian::Little => decode_with::<LittleEndian>(data_type, payload),
        Endian::Big => decode_with::<BigEndian>(data_type, payload),
    }
}

fn decode_with<B: ByteOrder>(data_type: u32, payload: &[u8]) -> Result<Vec<f64>, MatError> {
    match data_type {
        MI_INT8 => Ok(payload.iter().map(|&b| b as i8 as f64).collect()),
        MI_UINT8 | MI_UTF8 => Ok(payload.iter().map(|&b| b as f64).collect()),
        MI_INT16 => chunked(payload, 2, |b| B::read_i16(b) as f64),
        MI_UINT16 | MI_UTF16 => chunked(payload, 2, |b| B::read_u16(b) as f64),
        MI_INT32 => chunked(payload, 4, |b| B::read_i32(b) as f64),
        MI_UINT32 | MI_UTF32 => chunked(payload, 4, |b| B::read_u32(b) as f64),
        MI_SINGLE => chunked(payload, 4, |b| B::read_f32(b) as f64),
        MI_DOUBLE => chunked(payload, 8, B::read_f64),
        MI_INT64 => chunked(payload, 8, |b| B::read_i64(b) as f64),
        MI_UINT64 => chunked(payload, 8, |b| B::read_u64(b) as f64),
        other => Err(MatError::UnsupportedDataType(other)),
    }
}

fn chunked(payload: &[u8], size: usize, read: impl Fn(&[u8]) -> f64) -> Result<Vec<f64>, MatError> {
    if payload.len() % size != 0 {
        return Err(MatError::Corrupt(format!(
            "{} bytes is not a multiple of the {}-byte element size",
            payload.len(),
            size
        )));
    }
    Ok(payload.chunks_exact(size).map(read).collect())
}

fn decode_chars(data_type: u32, payload: &[u8], endian: Endian) -> Result<Vec<char>, MatError> {
    match data_type {
        MI_UTF8 => Ok(String::from_utf8_lossy(payload).chars().collect()),
        // Legacy 8-bit text is Latin-1
        MI_INT8 | MI_UINT8 => Ok(payload.iter().map(|&b| b as char).collect()),
        MI_UINT16 | MI_UTF16 => {
            let units: Vec<u16> = decode_numbers(data_type, payload, endian)?
                .into_iter()
                .map(|u| u as u16)
                .collect();
            Ok(char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect())
        }
        MI_UINT32 | MI_UTF32 | MI_INT32 => Ok(decode_numbers(data_type, payload, endian)?
            .into_iter()
            .map(|u| char::from_u32(u as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()),
        other => Err(MatError::UnsupportedDataType(other)),
    }
}
