use serde::Serialize;

/// MATLAB array class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatClass {
    /// Cell array
    Cell,
    /// Struct array
    Struct,
    /// Character array
    Char,
    /// IEEE double
    Double,
    /// IEEE single
    Single,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// Logical (stored as uint8)
    Logical,
}

impl MatClass {
    /// Map an `mxCLASS` code; sparse, object and unknown classes give `None`
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => MatClass::Cell,
            2 => MatClass::Struct,
            4 => MatClass::Char,
            6 => MatClass::Double,
            7 => MatClass::Single,
            8 => MatClass::Int8,
            9 => MatClass::UInt8,
            10 => MatClass::Int16,
            11 => MatClass::UInt16,
            12 => MatClass::Int32,
            13 => MatClass::UInt32,
            14 => MatClass::Int64,
            15 => MatClass::UInt64,
            _ => return None,
        })
    }

    /// MATLAB's name for the class
    pub fn name(&self) -> &'static str {
        match self {
            MatClass::Cell => "cell",
            MatClass::Struct => "struct",
            MatClass::Char => "char",
            MatClass::Double => "double",
            MatClass::Single => "single",
            MatClass::Int8 => "int8",
            MatClass::UInt8 => "uint8",
            MatClass::Int16 => "int16",
            MatClass::UInt16 => "uint16",
            MatClass::Int32 => "int32",
            MatClass::UInt32 => "uint32",
            MatClass::Int64 => "int64",
            MatClass::UInt64 => "uint64",
            MatClass::Logical => "logical",
        }
    }
}

/// Numeric or logical array, column-major, widened to `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    /// Storage class in the file
    pub class: MatClass,
    /// Dimensions (at least two)
    pub dims: Vec<usize>,
    /// Real part
    pub real: Vec<f64>,
    /// Imaginary part, for complex arrays
    pub imag: Option<Vec<f64>>,
}

impl NumericArray {
    /// Number of rows
    pub fn rows(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// Number of columns (trailing dimensions folded together)
    pub fn cols(&self) -> usize {
        self.dims.iter().skip(1).product()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// True if the array has no elements
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Real entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.real.get(row + col * self.rows()).copied()
    }

    /// One row of the real part
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        (0..self.cols()).map(|col| self.get(row, col)).collect()
    }

    /// The single value of a 1×1 array
    pub fn scalar(&self) -> Option<f64> {
        match self.real.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }
}

/// Character array, column-major
#[derive(Debug, Clone, PartialEq)]
pub struct CharArray {
    /// Dimensions
    pub dims: Vec<usize>,
    /// Characters in column-major order
    pub chars: Vec<char>,
}

impl CharArray {
    /// Each row as a string, trailing blanks removed
    pub fn rows(&self) -> Vec<String> {
        let rows = self.dims.first().copied().unwrap_or(0);
        if rows == 0 {
            return Vec::new();
        }
        let cols = self.chars.len() / rows;
        (0..rows)
            .map(|r| {
                let row: String = (0..cols)
                    .filter_map(|c| self.chars.get(r + c * rows))
                    .collect();
                row.trim_end().to_string()
            })
            .collect()
    }

    /// The text, with rows joined by newlines
    pub fn to_string_lossy(&self) -> String {
        self.rows().join("\n")
    }
}

/// Cell array, column-major
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    /// Dimensions
    pub dims: Vec<usize>,
    /// Cell contents
    pub cells: Vec<MatValue>,
}

/// Struct array; every element carries every field
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    /// Dimensions
    pub dims: Vec<usize>,
    /// Field names, in file order
    pub field_names: Vec<String>,
    /// Field values, element-major: `values[element * n_fields + field]`
    pub values: Vec<MatValue>,
}

impl StructArray {
    /// Number of struct elements
    pub fn len(&self) -> usize {
        if self.field_names.is_empty() {
            self.dims.iter().product()
        } else {
            self.values.len() / self.field_names.len()
        }
    }

    /// True if the struct array has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of `name` in element `element`
    pub fn field(&self, element: usize, name: &str) -> Option<&MatValue> {
        let index = self.field_names.iter().position(|f| f == name)?;
        self.values.get(element * self.field_names.len() + index)
    }
}

/// A decoded MATLAB array
#[derive(Debug, Clone, PartialEq)]
pub enum MatValue {
    /// Numeric or logical array
    Numeric(NumericArray),
    /// Character array
    Char(CharArray),
    /// Cell array
    Cell(CellArray),
    /// Struct array
    Struct(StructArray),
}

impl MatValue {
    /// Array dimensions
    pub fn dims(&self) -> &[usize] {
        match self {
            MatValue::Numeric(a) => &a.dims,
            MatValue::Char(a) => &a.dims,
            MatValue::Cell(a) => &a.dims,
            MatValue::Struct(a) => &a.dims,
        }
    }

    /// Storage class
    pub fn class(&self) -> MatClass {
        match self {
            MatValue::Numeric(a) => a.class,
            MatValue::Char(_) => MatClass::Char,
            MatValue::Cell(_) => MatClass::Cell,
            MatValue::Struct(_) => MatClass::Struct,
        }
    }

    /// Field `name` of struct element `element`
    pub fn field(&self, element: usize, name: &str) -> Option<&MatValue> {
        self.as_struct()?.field(element, name)
    }

    /// Cell `index` (column-major linear index)
    pub fn cell(&self, index: usize) -> Option<&MatValue> {
        match self {
            MatValue::Cell(a) => a.cells.get(index),
            _ => None,
        }
    }

    /// Cell contents, if this is a cell array
    pub fn cells(&self) -> Option<&[MatValue]> {
        match self {
            MatValue::Cell(a) => Some(&a.cells),
            _ => None,
        }
    }

    /// Numeric view
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            MatValue::Numeric(a) => Some(a),
            _ => None,
        }
    }

    /// Struct view
    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            MatValue::Struct(a) => Some(a),
            _ => None,
        }
    }

    /// Text of a char array
    pub fn as_string(&self) -> Option<String> {
        match self {
            MatValue::Char(a) => Some(a.to_string_lossy()),
            _ => None,
        }
    }

    /// Short description such as `double [642x3]`
    pub fn describe(&self) -> String {
        let dims: Vec<String> = self.dims().iter().map(usize::to_string).collect();
        format!("{} [{}]", self.class().name(), dims.join("x"))
    }
}
