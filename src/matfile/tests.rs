use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::*;

/// Minimal level-5 encoder for building fixtures
struct Encoder {
    big_endian: bool,
}

impl Encoder {
    const LE: Encoder = Encoder { big_endian: false };
    const BE: Encoder = Encoder { big_endian: true };

    fn u32(&self, v: u32) -> [u8; 4] {
        if self.big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    }

    fn element(&self, data_type: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.u32(data_type));
        out.extend_from_slice(&self.u32(data.len() as u32));
        out.extend_from_slice(data);
        while out.len() % 8 != 0 {
            out.push(0);
        }
        out
    }

    fn small(&self, data_type: u32, data: &[u8]) -> Vec<u8> {
        assert!(data.len() <= 4);
        let mut out = Vec::new();
        out.extend_from_slice(&self.u32(((data.len() as u32) << 16) | data_type));
        out.extend_from_slice(data);
        out.resize(8, 0);
        out
    }

    fn i32s(&self, values: &[i32]) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| {
                if self.big_endian {
                    v.to_be_bytes()
                } else {
                    v.to_le_bytes()
                }
            })
            .collect()
    }

    fn f64s(&self, values: &[f64]) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| {
                if self.big_endian {
                    v.to_be_bytes()
                } else {
                    v.to_le_bytes()
                }
            })
            .collect()
    }

    fn matrix(&self, name: &str, flags: u32, dims: &[i32], body: &[u8]) -> Vec<u8> {
        let mut flag_bytes = self.u32(flags).to_vec();
        flag_bytes.extend_from_slice(&[0; 4]);
        let mut inner = self.element(6, &flag_bytes);
        inner.extend(self.element(5, &self.i32s(dims)));
        inner.extend(self.element(1, name.as_bytes()));
        inner.extend_from_slice(body);
        self.element(14, &inner)
    }

    /// Double matrix from column-major data
    fn double(&self, name: &str, rows: i32, cols: i32, data: &[f64]) -> Vec<u8> {
        self.matrix(name, 6, &[rows, cols], &self.element(9, &self.f64s(data)))
    }

    fn text(&self, name: &str, text: &str) -> Vec<u8> {
        let units: Vec<u8> = text
            .encode_utf16()
            .flat_map(|u| {
                if self.big_endian {
                    u.to_be_bytes()
                } else {
                    u.to_le_bytes()
                }
            })
            .collect();
        let dims = [1, text.encode_utf16().count() as i32];
        self.matrix(name, 4, &dims, &self.element(4, &units))
    }

    fn cell(&self, name: &str, dims: &[i32], children: &[Vec<u8>]) -> Vec<u8> {
        self.matrix(name, 1, dims, &children.concat())
    }

    fn structure(&self, name: &str, fields: &[&str], values: &[Vec<u8>]) -> Vec<u8> {
        let mut names = Vec::new();
        for field in fields {
            let mut padded = field.as_bytes().to_vec();
            padded.resize(32, 0);
            names.extend(padded);
        }
        let mut body = self.small(5, &self.i32s(&[32]));
        body.extend(self.element(1, &names));
        body.extend(values.concat());
        self.matrix(name, 2, &[1, 1], &body)
    }

    fn file(&self, variables: &[Vec<u8>]) -> Vec<u8> {
        let mut header = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created on: test".to_vec();
        header.resize(116, b' ');
        header.extend_from_slice(&[0; 8]);
        if self.big_endian {
            header.extend_from_slice(&0x0100u16.to_be_bytes());
            header.extend_from_slice(b"MI");
        } else {
            header.extend_from_slice(&0x0100u16.to_le_bytes());
            header.extend_from_slice(b"IM");
        }
        header.extend(variables.concat());
        header
    }
}

fn compressed(variable: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(variable).unwrap();
    let deflated = encoder.finish().unwrap();
    let mut out = Vec::new();
    out.extend_from_slice(&15u32.to_le_bytes());
    out.extend_from_slice(&(deflated.len() as u32).to_le_bytes());
    out.extend(deflated);
    out
}

#[test]
fn test_read_double_matrix() {
    let enc = Encoder::LE;
    // [1 2 3; 4 5 6] stored column-major
    let bytes = enc.file(&[enc.double("m", 2, 3, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0])]);
    let mat = MatFile::from_bytes(&bytes).unwrap();

    assert_eq!(mat.len(), 1);
    assert!(mat.header_text().starts_with("MATLAB 5.0"));
    let m = mat.get("m").unwrap().as_numeric().unwrap();
    assert_eq!(m.class, MatClass::Double);
    assert_eq!((m.rows(), m.cols()), (2, 3));
    assert_eq!(m.get(0, 2), Some(3.0));
    assert_eq!(m.get(1, 0), Some(4.0));
    assert_eq!(m.get(2, 0), None);
    assert_eq!(m.row(1), Some(vec![4.0, 5.0, 6.0]));
}

#[test]
fn test_nested_struct_navigation() {
    let enc = Encoder::LE;
    let pnt = enc.double("", 3, 3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    let tri = enc.double("", 1, 3, &[1.0, 2.0, 3.0]);
    let bnd = enc.structure("", &["pnt", "tri"], &[pnt, tri]);
    let unit = enc.text("", "mm");
    let headmodel = enc.structure("headmodel", &["bnd", "unit"], &[bnd, unit]);
    let mat = MatFile::from_bytes(&enc.file(&[headmodel])).unwrap();

    let headmodel = mat.get("headmodel").unwrap();
    assert_eq!(headmodel.class(), MatClass::Struct);
    assert_eq!(
        headmodel.field(0, "unit").and_then(MatValue::as_string),
        Some("mm".to_string())
    );

    let tri = headmodel
        .field(0, "bnd")
        .and_then(|bnd| bnd.field(0, "tri"))
        .and_then(MatValue::as_numeric)
        .unwrap();
    assert_eq!(tri.real, vec![1.0, 2.0, 3.0]);
    assert!(headmodel.field(0, "missing").is_none());
    assert!(headmodel.field(1, "bnd").is_none());
}

#[test]
fn test_cell_of_strings_and_empty() {
    let enc = Encoder::LE;
    let empty = enc.element(14, &[]);
    let cell = enc.cell(
        "lockNames",
        &[1, 3],
        &[enc.text("", "TIM"), enc.text("", "RESP"), empty],
    );
    let mat = MatFile::from_bytes(&enc.file(&[cell])).unwrap();

    let cells = mat.get("lockNames").unwrap().cells().unwrap();
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[0].as_string().as_deref(), Some("TIM"));
    assert_eq!(cells[1].as_string().as_deref(), Some("RESP"));
    assert!(cells[2].as_numeric().unwrap().is_empty());
    assert_eq!(mat.get("lockNames").unwrap().describe(), "cell [1x3]");
}

#[test]
fn test_compressed_variable() {
    let enc = Encoder::LE;
    let variable = enc.double("x", 1, 2, &[0.5, -2.0]);
    let bytes = enc.file(&[compressed(&variable), enc.double("y", 1, 1, &[7.0])]);
    let mat = MatFile::from_bytes(&bytes).unwrap();

    assert_eq!(mat.names().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(mat.get("x").unwrap().as_numeric().unwrap().real, vec![0.5, -2.0]);
    assert_eq!(mat.get("y").unwrap().as_numeric().unwrap().scalar(), Some(7.0));
}

#[test]
fn test_big_endian_file() {
    let enc = Encoder::BE;
    let bytes = enc.file(&[enc.double("b", 1, 2, &[1.5, 2.5]), enc.text("s", "bti")]);
    let mat = MatFile::from_bytes(&bytes).unwrap();
    assert_eq!(mat.get("b").unwrap().as_numeric().unwrap().real, vec![1.5, 2.5]);
    assert_eq!(mat.get("s").unwrap().as_string().as_deref(), Some("bti"));
}

#[test]
fn test_logical_complex_and_integer_classes() {
    let enc = Encoder::LE;
    let logical = enc.matrix("l", 9 | 0x0200, &[1, 3], &enc.element(2, &[1, 0, 1]));
    let ints = enc.matrix("i", 12, &[1, 2], &enc.element(5, &enc.i32s(&[-3, 40])));
    let mut complex_body = enc.element(9, &enc.f64s(&[1.0]));
    complex_body.extend(enc.element(9, &enc.f64s(&[2.0])));
    let complex = enc.matrix("c", 6 | 0x0800, &[1, 1], &complex_body);

    let mat = MatFile::from_bytes(&enc.file(&[logical, ints, complex])).unwrap();

    let l = mat.get("l").unwrap().as_numeric().unwrap();
    assert_eq!(l.class, MatClass::Logical);
    assert_eq!(l.real, vec![1.0, 0.0, 1.0]);

    let i = mat.get("i").unwrap().as_numeric().unwrap();
    assert_eq!(i.class, MatClass::Int32);
    assert_eq!(i.real, vec![-3.0, 40.0]);

    let c = mat.get("c").unwrap().as_numeric().unwrap();
    assert_eq!(c.imag, Some(vec![2.0]));
}

#[test]
fn test_rejects_non_mat_input() {
    assert!(matches!(
        MatFile::from_bytes(b"hello"),
        Err(MatError::NotMatFile(_))
    ));

    let mut bytes = Encoder::LE.file(&[]);
    bytes[..6].copy_from_slice(b"HDF5xx");
    assert!(matches!(
        MatFile::from_bytes(&bytes),
        Err(MatError::NotMatFile(_))
    ));
}

#[test]
fn test_rejects_v73() {
    let mut bytes = Encoder::LE.file(&[]);
    bytes[124..126].copy_from_slice(&0x0200u16.to_le_bytes());
    assert!(matches!(
        MatFile::from_bytes(&bytes),
        Err(MatError::UnsupportedVersion(0x0200))
    ));
}

#[test]
fn test_truncated_element() {
    let enc = Encoder::LE;
    let mut bytes = enc.file(&[enc.double("m", 2, 2, &[1.0, 2.0, 3.0, 4.0])]);
    bytes.truncate(bytes.len() - 16);
    assert!(matches!(
        MatFile::from_bytes(&bytes),
        Err(MatError::Truncated { .. })
    ));
}

#[test]
fn test_unsupported_sparse_class() {
    let enc = Encoder::LE;
    let sparse = enc.matrix("s", 5, &[2, 2], &[]);
    assert!(matches!(
        MatFile::from_bytes(&enc.file(&[sparse])),
        Err(MatError::UnsupportedClass(5))
    ));
}

#[test]
fn test_empty_file_has_no_variables() {
    let mat = MatFile::from_bytes(&Encoder::LE.file(&[])).unwrap();
    assert!(mat.is_empty());
}

#[test]
fn test_struct_field_count_overflow_is_corrupt() {
    let enc = Encoder::LE;
    let mut names = Vec::new();
    for field in ["a", "b", "c"] {
        let mut padded = field.as_bytes().to_vec();
        padded.resize(32, 0);
        names.extend(padded);
    }
    let mut body = enc.small(5, &enc.i32s(&[32]));
    body.extend(enc.element(1, &names));
    // The element count alone fits in usize; times three fields it does not
    let huge = enc.matrix("s", 2, &[i32::MAX, i32::MAX, 2], &body);

    assert!(matches!(
        MatFile::from_bytes(&enc.file(&[huge])),
        Err(MatError::Corrupt(_))
    ));
}

#[test]
fn test_complex_imaginary_length_mismatch() {
    let enc = Encoder::LE;
    let mut body = enc.element(9, &enc.f64s(&[1.0]));
    body.extend(enc.element(9, &enc.f64s(&[2.0, 3.0])));
    let complex = enc.matrix("c", 6 | 0x0800, &[1, 1], &body);

    assert!(matches!(
        MatFile::from_bytes(&enc.file(&[complex])),
        Err(MatError::Corrupt(_))
    ));
}
