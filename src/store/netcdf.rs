//! netCDF [`MeshStore`] backend, behind the `netcdf` feature.
//!
//! A thin adapter over the `netcdf` crate: dimensions, variables, and
//! attributes map one-to-one, double/int/char variables carry the three
//! payload types, and bulk transfers move whole variables. Everything
//! topology-specific stays above the [`MeshStore`] boundary.

use std::path::Path;

use crate::error::UgridError;
use crate::store::{AttrValue, MeshStore, OpenMode, StoreError, VarType};

enum Inner {
    Read(netcdf::File),
    Write(netcdf::FileMut),
}

/// File-backed store over a netCDF dataset.
pub struct NetCdfStore {
    inner: Inner,
}

fn backend(e: netcdf::error::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl NetCdfStore {
    /// Opens `path` under the given mode.
    ///
    /// `Read` and `Write` require an existing file; `Replace` creates or
    /// truncates. Failures surface as [`UgridError::Open`] with the
    /// backend's message.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self, UgridError> {
        let path = path.as_ref();
        let open_err = |e: netcdf::error::Error| UgridError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let inner = match mode {
            OpenMode::Read => Inner::Read(netcdf::open(path).map_err(open_err)?),
            OpenMode::Write => Inner::Write(netcdf::append(path).map_err(open_err)?),
            OpenMode::Replace => Inner::Write(netcdf::create(path).map_err(open_err)?),
        };
        Ok(NetCdfStore { inner })
    }

    fn file(&self) -> &netcdf::File {
        match &self.inner {
            Inner::Read(f) => f,
            Inner::Write(f) => f,
        }
    }

    fn file_mut(&mut self) -> Result<&mut netcdf::FileMut, StoreError> {
        match &mut self.inner {
            Inner::Read(_) => Err(StoreError::ReadOnly),
            Inner::Write(f) => Ok(f),
        }
    }

    fn var_len(&self, name: &str) -> Result<usize, StoreError> {
        let var = self
            .file()
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        Ok(var.dimensions().iter().map(|d| d.len()).product())
    }
}

impl MeshStore for NetCdfStore {
    fn def_dim(&mut self, name: &str, len: usize) -> Result<(), StoreError> {
        if let Some(existing) = self.file().dimension(name) {
            if existing.len() != len {
                return Err(StoreError::DimensionRedefined {
                    name: name.to_string(),
                    existing: existing.len(),
                    requested: len,
                });
            }
            return Ok(());
        }
        self.file_mut()?.add_dimension(name, len).map_err(backend)?;
        Ok(())
    }

    fn dim_len(&self, name: &str) -> Result<usize, StoreError> {
        self.file()
            .dimension(name)
            .map(|d| d.len())
            .ok_or_else(|| StoreError::UnknownDimension(name.to_string()))
    }

    fn has_dim(&self, name: &str) -> bool {
        self.file().dimension(name).is_some()
    }

    fn def_var(&mut self, name: &str, ty: VarType, dims: &[&str]) -> Result<(), StoreError> {
        if self.file().variable(name).is_some() {
            return Err(StoreError::VariableRedefined(name.to_string()));
        }
        let file = self.file_mut()?;
        match ty {
            VarType::Double => file.add_variable::<f64>(name, dims).map_err(backend)?,
            VarType::Int => file.add_variable::<i64>(name, dims).map_err(backend)?,
            VarType::Char => file.add_variable::<u8>(name, dims).map_err(backend)?,
        };
        Ok(())
    }

    fn var_names(&self) -> Vec<String> {
        self.file().variables().map(|v| v.name()).collect()
    }

    fn has_var(&self, name: &str) -> bool {
        self.file().variable(name).is_some()
    }

    fn var_dims(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let var = self
            .file()
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        Ok(var.dimensions().iter().map(|d| d.name()).collect())
    }

    fn put_attr(&mut self, var: &str, name: &str, value: AttrValue) -> Result<(), StoreError> {
        let file = self.file_mut()?;
        let mut var = file
            .variable_mut(var)
            .ok_or_else(|| StoreError::UnknownVariable(var.to_string()))?;
        match value {
            AttrValue::Text(s) => var.add_attribute(name, s.as_str()).map_err(backend)?,
            AttrValue::Int(v) => var.add_attribute(name, v as i32).map_err(backend)?,
        };
        Ok(())
    }

    fn get_attr(&self, var: &str, name: &str) -> Result<Option<AttrValue>, StoreError> {
        let variable = self
            .file()
            .variable(var)
            .ok_or_else(|| StoreError::UnknownVariable(var.to_string()))?;
        let Some(attr) = variable.attribute(name) else {
            return Ok(None);
        };
        let value = attr.value().map_err(backend)?;
        match value {
            netcdf::AttrValue::Str(s) => Ok(Some(AttrValue::Text(s))),
            netcdf::AttrValue::Schar(v) => Ok(Some(AttrValue::Int(v as i64))),
            netcdf::AttrValue::Short(v) => Ok(Some(AttrValue::Int(v as i64))),
            netcdf::AttrValue::Int(v) => Ok(Some(AttrValue::Int(v as i64))),
            netcdf::AttrValue::Longlong(v) => Ok(Some(AttrValue::Int(v))),
            netcdf::AttrValue::Uchar(v) => Ok(Some(AttrValue::Int(v as i64))),
            netcdf::AttrValue::Ushort(v) => Ok(Some(AttrValue::Int(v as i64))),
            netcdf::AttrValue::Uint(v) => Ok(Some(AttrValue::Int(v as i64))),
            other => Err(StoreError::Backend(format!(
                "attribute `{name}` on `{var}` has unsupported type {other:?}"
            ))),
        }
    }

    fn read_doubles(&self, name: &str) -> Result<Vec<f64>, StoreError> {
        let len = self.var_len(name)?;
        let var = self
            .file()
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        let mut data = vec![0.0f64; len];
        var.values_to(&mut data, ..).map_err(backend)?;
        Ok(data)
    }

    fn read_ints(&self, name: &str) -> Result<Vec<i64>, StoreError> {
        let len = self.var_len(name)?;
        let var = self
            .file()
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        let mut data = vec![0i64; len];
        var.values_to(&mut data, ..).map_err(backend)?;
        Ok(data)
    }

    fn read_chars(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let len = self.var_len(name)?;
        let var = self
            .file()
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        let mut data = vec![0u8; len];
        var.values_to(&mut data, ..).map_err(backend)?;
        Ok(data)
    }

    fn write_doubles(&mut self, name: &str, data: &[f64]) -> Result<(), StoreError> {
        let expected = self.var_len(name)?;
        if data.len() != expected {
            return Err(StoreError::LengthMismatch {
                var: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        let file = self.file_mut()?;
        let mut var = file
            .variable_mut(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        var.put_values(data, ..).map_err(backend)
    }

    fn write_ints(&mut self, name: &str, data: &[i64]) -> Result<(), StoreError> {
        let expected = self.var_len(name)?;
        if data.len() != expected {
            return Err(StoreError::LengthMismatch {
                var: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        let file = self.file_mut()?;
        let mut var = file
            .variable_mut(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        var.put_values(data, ..).map_err(backend)
    }

    fn write_chars(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let expected = self.var_len(name)?;
        if data.len() != expected {
            return Err(StoreError::LengthMismatch {
                var: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        let file = self.file_mut()?;
        let mut var = file
            .variable_mut(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        var.put_values(data, ..).map_err(backend)
    }

    fn sync(&mut self) -> Result<(), StoreError> {
        // The netcdf crate flushes on drop; nothing to do eagerly.
        Ok(())
    }
}
