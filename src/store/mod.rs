//! Pluggable storage boundary for the topology engine.
//!
//! [`MeshStore`] abstracts the two external collaborators of the core:
//! the file resource primitive (dimensions, variables, attributes) and the
//! bulk array I/O primitive (typed reads and writes of whole variables).
//! The topology, codec, and transaction layers are pure over this trait;
//! any self-describing array store can sit behind it. The crate ships an
//! in-memory implementation ([`InMemoryStore`]) with netCDF-like fill
//! semantics, and a real netCDF adapter behind the `netcdf` feature.
//!
//! Sharing one store between threads is not supported; callers must
//! serialize access themselves. Independent stores for different files
//! need no coordination.

pub mod memory;
#[cfg(feature = "netcdf")]
pub mod netcdf;

pub use memory::InMemoryStore;
#[cfg(feature = "netcdf")]
pub use netcdf::NetCdfStore;

use thiserror::Error;

/// Failures reported by a storage backend.
///
/// Each variant carries the underlying message at construction time, so
/// the failure reason travels with the error value instead of living in
/// backend-global state that the next call could overwrite.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A dimension name was looked up before being defined.
    #[error("dimension `{0}` is not defined")]
    UnknownDimension(String),
    /// A variable name was looked up before being defined.
    #[error("variable `{0}` is not defined")]
    UnknownVariable(String),
    /// A dimension was defined twice with disagreeing lengths.
    #[error("dimension `{name}` already has length {existing}, cannot redefine to {requested}")]
    DimensionRedefined {
        /// Dimension name.
        name: String,
        /// Length recorded at first definition.
        existing: usize,
        /// Conflicting length of the second definition.
        requested: usize,
    },
    /// A variable was defined twice.
    #[error("variable `{0}` is already defined")]
    VariableRedefined(String),
    /// A read or write used the wrong element type for a variable.
    #[error("variable `{var}` holds {actual} data, not {expected}")]
    TypeMismatch {
        /// Variable name.
        var: String,
        /// Type the caller asked for.
        expected: VarType,
        /// Type the variable was defined with.
        actual: VarType,
    },
    /// A bulk write did not match the variable's defined size.
    #[error("variable `{var}` spans {expected} values, write supplied {actual}")]
    LengthMismatch {
        /// Variable name.
        var: String,
        /// Element count implied by the variable's dimensions.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },
    /// A mutation was attempted on a backend opened read-only.
    #[error("store is read-only")]
    ReadOnly,
    /// Any other backend failure, with the backend's own message.
    #[error("{0}")]
    Backend(String),
}

/// Mode a file is opened in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OpenMode {
    /// Existing file, read-only.
    Read,
    /// Existing file, append definitions and data.
    Write,
    /// Create or truncate, then write.
    Replace,
}

impl OpenMode {
    /// Whether definitions and data writes are permitted in this mode.
    #[inline]
    pub fn writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

/// Element type of a stored variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarType {
    /// 64-bit floating point.
    Double,
    /// 64-bit signed integer.
    Int,
    /// Raw bytes (fixed-width text rows).
    Char,
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VarType::Double => "double",
            VarType::Int => "int",
            VarType::Char => "char",
        };
        f.write_str(s)
    }
}

/// Value of a variable attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Text attribute.
    Text(String),
    /// Integer attribute.
    Int(i64),
}

impl AttrValue {
    /// Borrows the text payload, if this is a text attribute.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Int(_) => None,
        }
    }

    /// Returns the integer payload, if this is an integer attribute.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            AttrValue::Text(_) => None,
        }
    }
}

/// One typed flat buffer, as produced by the entity encoder and consumed
/// by bulk writes.
#[derive(Clone, Debug, PartialEq)]
pub enum VarData {
    /// Floating point payload.
    Doubles(Vec<f64>),
    /// Integer payload.
    Ints(Vec<i64>),
    /// Fixed-width text payload.
    Chars(Vec<u8>),
}

impl VarData {
    /// Element type of the payload.
    pub fn var_type(&self) -> VarType {
        match self {
            VarData::Doubles(_) => VarType::Double,
            VarData::Ints(_) => VarType::Int,
            VarData::Chars(_) => VarType::Char,
        }
    }

    /// Number of elements in the payload.
    pub fn len(&self) -> usize {
        match self {
            VarData::Doubles(v) => v.len(),
            VarData::Ints(v) => v.len(),
            VarData::Chars(v) => v.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The storage boundary the topology engine is built on.
///
/// Implementations provide netCDF-like semantics: dimensions are named
/// lengths, variables are typed arrays over dimension lists, attributes
/// hang off variables, and bulk transfers move whole variables at once.
/// Variable enumeration follows definition order; topology indices depend
/// on it.
pub trait MeshStore {
    /// Defines a named dimension. Redefining with the same length is a
    /// no-op; a conflicting length fails.
    fn def_dim(&mut self, name: &str, len: usize) -> Result<(), StoreError>;

    /// Length of a defined dimension.
    fn dim_len(&self, name: &str) -> Result<usize, StoreError>;

    /// Whether a dimension is defined.
    fn has_dim(&self, name: &str) -> bool;

    /// Defines a typed variable over the given dimensions.
    fn def_var(&mut self, name: &str, ty: VarType, dims: &[&str]) -> Result<(), StoreError>;

    /// All variable names, in definition order.
    fn var_names(&self) -> Vec<String>;

    /// Whether a variable is defined.
    fn has_var(&self, name: &str) -> bool;

    /// Dimension names of a variable, outermost first.
    fn var_dims(&self, var: &str) -> Result<Vec<String>, StoreError>;

    /// Sets or replaces an attribute on a variable.
    fn put_attr(&mut self, var: &str, name: &str, value: AttrValue) -> Result<(), StoreError>;

    /// Reads an attribute from a variable, `None` when absent.
    fn get_attr(&self, var: &str, name: &str) -> Result<Option<AttrValue>, StoreError>;

    /// Bulk-reads a floating point variable.
    fn read_doubles(&self, var: &str) -> Result<Vec<f64>, StoreError>;

    /// Bulk-reads an integer variable.
    fn read_ints(&self, var: &str) -> Result<Vec<i64>, StoreError>;

    /// Bulk-reads a fixed-width text variable as raw bytes.
    fn read_chars(&self, var: &str) -> Result<Vec<u8>, StoreError>;

    /// Bulk-writes a floating point variable.
    fn write_doubles(&mut self, var: &str, data: &[f64]) -> Result<(), StoreError>;

    /// Bulk-writes an integer variable.
    fn write_ints(&mut self, var: &str, data: &[i64]) -> Result<(), StoreError>;

    /// Bulk-writes a fixed-width text variable from raw bytes.
    fn write_chars(&mut self, var: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Bulk-writes one encoded buffer, dispatching on its payload type.
    fn write_data(&mut self, var: &str, data: &VarData) -> Result<(), StoreError> {
        match data {
            VarData::Doubles(v) => self.write_doubles(var, v),
            VarData::Ints(v) => self.write_ints(var, v),
            VarData::Chars(v) => self.write_chars(var, v),
        }
    }

    /// Flushes pending state to the underlying resource.
    fn sync(&mut self) -> Result<(), StoreError>;
}
