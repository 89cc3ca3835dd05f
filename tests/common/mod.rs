//! Shared fixtures: a minimal little-endian MAT v5 writer.
#![allow(dead_code)]

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT16: u32 = 4;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

const MX_CELL: u32 = 1;
const MX_STRUCT: u32 = 2;
const MX_CHAR: u32 = 4;
const MX_DOUBLE: u32 = 6;

fn element(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 16);
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

fn i32s(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn matrix(name: &str, class: u32, dims: &[usize], body: &[u8]) -> Vec<u8> {
    let mut flags = class.to_le_bytes().to_vec();
    flags.extend_from_slice(&[0; 4]);
    let dims: Vec<i32> = dims.iter().map(|&d| d as i32).collect();

    let mut inner = element(MI_UINT32, &flags);
    inner.extend(element(MI_INT32, &i32s(&dims)));
    inner.extend(element(MI_INT8, name.as_bytes()));
    inner.extend_from_slice(body);
    element(MI_MATRIX, &inner)
}

/// Double matrix from rows (stored column-major)
pub fn double(name: &str, rows: &[Vec<f64>]) -> Vec<u8> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    let mut column_major = Vec::with_capacity(n_rows * n_cols);
    for col in 0..n_cols {
        for row in rows {
            column_major.extend_from_slice(&row[col].to_le_bytes());
        }
    }
    matrix(name, MX_DOUBLE, &[n_rows, n_cols], &element(MI_DOUBLE, &column_major))
}

/// 1×N char array
pub fn text(name: &str, value: &str) -> Vec<u8> {
    let units: Vec<u8> = value.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
    let len = value.encode_utf16().count();
    matrix(name, MX_CHAR, &[1, len], &element(MI_UINT16, &units))
}

/// 1×N cell array of already encoded (unnamed) values
pub fn cell(name: &str, values: &[Vec<u8>]) -> Vec<u8> {
    matrix(name, MX_CELL, &[1, values.len()], &values.concat())
}

/// 1×1 struct with the given fields
pub fn structure(name: &str, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut names = Vec::new();
    for (field, _) in fields {
        let mut padded = field.as_bytes().to_vec();
        padded.resize(32, 0);
        names.extend(padded);
    }
    let mut body = element(MI_INT32, &i32s(&[32]));
    body.extend(element(MI_INT8, &names));
    for (_, value) in fields {
        body.extend_from_slice(value);
    }
    matrix(name, MX_STRUCT, &[1, 1], &body)
}

/// Complete file from encoded top-level variables
pub fn mat_file(variables: &[Vec<u8>]) -> Vec<u8> {
    let mut header = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created on: fixture".to_vec();
    header.resize(116, b' ');
    header.extend_from_slice(&[0; 8]);
    header.extend_from_slice(&0x0100u16.to_le_bytes());
    header.extend_from_slice(b"IM");
    header.extend(variables.concat());
    header
}

/// A FieldTrip-style head model: a tetrahedron in millimeters
pub fn headmodel_mat() -> Vec<u8> {
    let pnt = double(
        "",
        &[
            vec![0.0, 0.0, 0.0],
            vec![10.0, 0.0, 0.0],
            vec![0.0, 10.0, 0.0],
            vec![0.0, 0.0, 10.0],
        ],
    );
    let tri = double(
        "",
        &[
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 4.0],
            vec![1.0, 3.0, 4.0],
            vec![2.0, 3.0, 4.0],
        ],
    );
    let bnd = structure("", &[("pnt", pnt), ("tri", tri)]);
    mat_file(&[structure(
        "headmodel",
        &[("bnd", bnd), ("type", text("", "singleshell")), ("unit", text("", "mm"))],
    )])
}

/// Transform dump with a filename record and a pure-translation `bti2spm`
pub const TRANSFORM_TXT: &str = "transform.filename = '100307_MEG_anatomy_transform.txt';
transform.bti2spm = [1 0 0 10
0 1 0 20
0 0 1 30
0 0 0 1];
transform.spm2bti = [1 0 0 -10
0 1 0 -20
0 0 1 -30
0 0 0 1];
";

/// RAS offset of 5 mm along each axis
pub const C_RAS: &str = "1 0 0 5\n0 1 0 5\n0 0 1 5\n0 0 0 1\n";
