//! In-memory [`MeshStore`] backend.
//!
//! Mirrors the semantics the engine relies on from a real netCDF file:
//! variables are typed arrays over named dimensions, and a variable that
//! was defined but never written reads back full of its type's fill value.
//! A bulk-read counter is kept so tests can assert that inquiry never
//! touches array data.

use std::cell::Cell;

use hashbrown::HashMap;

use crate::attrs::{DOUBLE_FILL, FILL_VALUE};
use crate::store::{AttrValue, MeshStore, StoreError, VarType};

#[derive(Clone, Debug)]
enum VarPayload {
    Doubles(Vec<f64>),
    Ints(Vec<i64>),
    Chars(Vec<u8>),
}

#[derive(Clone, Debug)]
struct Var {
    name: String,
    ty: VarType,
    dims: Vec<String>,
    attrs: Vec<(String, AttrValue)>,
    data: Option<VarPayload>,
}

/// Heap-backed store with netCDF-like read/write semantics.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    dims: HashMap<String, usize>,
    vars: Vec<Var>,
    var_index: HashMap<String, usize>,
    bulk_reads: Cell<u64>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bulk array reads issued so far.
    ///
    /// Inquiry must leave this untouched; only `*_get` is allowed to move
    /// it.
    pub fn bulk_reads(&self) -> u64 {
        self.bulk_reads.get()
    }

    fn var(&self, name: &str) -> Result<&Var, StoreError> {
        self.var_index
            .get(name)
            .map(|&i| &self.vars[i])
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))
    }

    fn var_mut(&mut self, name: &str) -> Result<&mut Var, StoreError> {
        match self.var_index.get(name) {
            Some(&i) => Ok(&mut self.vars[i]),
            None => Err(StoreError::UnknownVariable(name.to_string())),
        }
    }

    fn expected_len(&self, var: &Var) -> Result<usize, StoreError> {
        let mut len = 1usize;
        for dim in &var.dims {
            len *= self
                .dims
                .get(dim)
                .copied()
                .ok_or_else(|| StoreError::UnknownDimension(dim.clone()))?;
        }
        Ok(len)
    }

    fn check_type(var: &Var, expected: VarType) -> Result<(), StoreError> {
        if var.ty != expected {
            return Err(StoreError::TypeMismatch {
                var: var.name.clone(),
                expected,
                actual: var.ty,
            });
        }
        Ok(())
    }
}

impl MeshStore for InMemoryStore {
    fn def_dim(&mut self, name: &str, len: usize) -> Result<(), StoreError> {
        if let Some(&existing) = self.dims.get(name) {
            if existing != len {
                return Err(StoreError::DimensionRedefined {
                    name: name.to_string(),
                    existing,
                    requested: len,
                });
            }
            return Ok(());
        }
        self.dims.insert(name.to_string(), len);
        Ok(())
    }

    fn dim_len(&self, name: &str) -> Result<usize, StoreError> {
        self.dims
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownDimension(name.to_string()))
    }

    fn has_dim(&self, name: &str) -> bool {
        self.dims.contains_key(name)
    }

    fn def_var(&mut self, name: &str, ty: VarType, dims: &[&str]) -> Result<(), StoreError> {
        if self.var_index.contains_key(name) {
            return Err(StoreError::VariableRedefined(name.to_string()));
        }
        for dim in dims {
            if !self.dims.contains_key(*dim) {
                return Err(StoreError::UnknownDimension((*dim).to_string()));
            }
        }
        self.var_index.insert(name.to_string(), self.vars.len());
        self.vars.push(Var {
            name: name.to_string(),
            ty,
            dims: dims.iter().map(|d| (*d).to_string()).collect(),
            attrs: Vec::new(),
            data: None,
        });
        Ok(())
    }

    fn var_names(&self) -> Vec<String> {
        self.vars.iter().map(|v| v.name.clone()).collect()
    }

    fn has_var(&self, name: &str) -> bool {
        self.var_index.contains_key(name)
    }

    fn var_dims(&self, var: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.var(var)?.dims.clone())
    }

    fn put_attr(&mut self, var: &str, name: &str, value: AttrValue) -> Result<(), StoreError> {
        let var = self.var_mut(var)?;
        if let Some(slot) = var.attrs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            var.attrs.push((name.to_string(), value));
        }
        Ok(())
    }

    fn get_attr(&self, var: &str, name: &str) -> Result<Option<AttrValue>, StoreError> {
        let var = self.var(var)?;
        Ok(var
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    fn read_doubles(&self, name: &str) -> Result<Vec<f64>, StoreError> {
        let var = self.var(name)?;
        Self::check_type(var, VarType::Double)?;
        self.bulk_reads.set(self.bulk_reads.get() + 1);
        match &var.data {
            Some(VarPayload::Doubles(v)) => Ok(v.clone()),
            None => Ok(vec![DOUBLE_FILL; self.expected_len(var)?]),
            Some(_) => unreachable!("payload type pinned at definition"),
        }
    }

    fn read_ints(&self, name: &str) -> Result<Vec<i64>, StoreError> {
        let var = self.var(name)?;
        Self::check_type(var, VarType::Int)?;
        self.bulk_reads.set(self.bulk_reads.get() + 1);
        match &var.data {
            Some(VarPayload::Ints(v)) => Ok(v.clone()),
            None => Ok(vec![FILL_VALUE; self.expected_len(var)?]),
            Some(_) => unreachable!("payload type pinned at definition"),
        }
    }

    fn read_chars(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let var = self.var(name)?;
        Self::check_type(var, VarType::Char)?;
        self.bulk_reads.set(self.bulk_reads.get() + 1);
        match &var.data {
            Some(VarPayload::Chars(v)) => Ok(v.clone()),
            None => Ok(vec![b' '; self.expected_len(var)?]),
            Some(_) => unreachable!("payload type pinned at definition"),
        }
    }

    fn write_doubles(&mut self, name: &str, data: &[f64]) -> Result<(), StoreError> {
        let var = self.var(name)?;
        Self::check_type(var, VarType::Double)?;
        let expected = self.expected_len(var)?;
        if data.len() != expected {
            return Err(StoreError::LengthMismatch {
                var: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        self.var_mut(name)?.data = Some(VarPayload::Doubles(data.to_vec()));
        Ok(())
    }

    fn write_ints(&mut self, name: &str, data: &[i64]) -> Result<(), StoreError> {
        let var = self.var(name)?;
        Self::check_type(var, VarType::Int)?;
        let expected = self.expected_len(var)?;
        if data.len() != expected {
            return Err(StoreError::LengthMismatch {
                var: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        self.var_mut(name)?.data = Some(VarPayload::Ints(data.to_vec()));
        Ok(())
    }

    fn write_chars(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let var = self.var(name)?;
        Self::check_type(var, VarType::Char)?;
        let expected = self.expected_len(var)?;
        if data.len() != expected {
            return Err(StoreError::LengthMismatch {
                var: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        self.var_mut(name)?.data = Some(VarPayload::Chars(data.to_vec()));
        Ok(())
    }

    fn sync(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_and_vars_round_trip() {
        let mut s = InMemoryStore::new();
        s.def_dim("nNodes", 4).unwrap();
        s.def_var("x", VarType::Double, &["nNodes"]).unwrap();
        s.write_doubles("x", &[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.read_doubles("x").unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(s.var_dims("x").unwrap(), vec!["nNodes".to_string()]);
    }

    #[test]
    fn dim_redefinition_must_agree() {
        let mut s = InMemoryStore::new();
        s.def_dim("Two", 2).unwrap();
        assert!(s.def_dim("Two", 2).is_ok());
        assert!(matches!(
            s.def_dim("Two", 3),
            Err(StoreError::DimensionRedefined { .. })
        ));
    }

    #[test]
    fn unwritten_variables_read_as_fill() {
        let mut s = InMemoryStore::new();
        s.def_dim("nEdges", 3).unwrap();
        s.def_var("e", VarType::Int, &["nEdges"]).unwrap();
        assert_eq!(s.read_ints("e").unwrap(), vec![FILL_VALUE; 3]);
    }

    #[test]
    fn write_length_is_enforced() {
        let mut s = InMemoryStore::new();
        s.def_dim("nNodes", 4).unwrap();
        s.def_var("x", VarType::Double, &["nNodes"]).unwrap();
        assert!(matches!(
            s.write_doubles("x", &[1.0]),
            Err(StoreError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn type_is_pinned_at_definition() {
        let mut s = InMemoryStore::new();
        s.def_dim("n", 1).unwrap();
        s.def_var("x", VarType::Double, &["n"]).unwrap();
        assert!(matches!(
            s.read_ints("x"),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn attrs_replace_in_place_and_keep_order() {
        let mut s = InMemoryStore::new();
        s.def_var("t", VarType::Int, &[]).unwrap();
        s.put_attr("t", "cf_role", AttrValue::Text("mesh_topology".into()))
            .unwrap();
        s.put_attr("t", "start_index", AttrValue::Int(1)).unwrap();
        s.put_attr("t", "start_index", AttrValue::Int(0)).unwrap();
        assert_eq!(
            s.get_attr("t", "start_index").unwrap(),
            Some(AttrValue::Int(0))
        );
        assert_eq!(s.get_attr("t", "missing").unwrap(), None);
    }

    #[test]
    fn bulk_read_counter_moves_only_on_reads() {
        let mut s = InMemoryStore::new();
        s.def_dim("n", 2).unwrap();
        s.def_var("x", VarType::Double, &["n"]).unwrap();
        assert_eq!(s.bulk_reads(), 0);
        let _ = s.var_dims("x").unwrap();
        let _ = s.dim_len("n").unwrap();
        assert_eq!(s.bulk_reads(), 0);
        let _ = s.read_doubles("x").unwrap();
        assert_eq!(s.bulk_reads(), 1);
    }

    #[test]
    fn var_names_keep_definition_order() {
        let mut s = InMemoryStore::new();
        s.def_var("b", VarType::Int, &[]).unwrap();
        s.def_var("a", VarType::Int, &[]).unwrap();
        assert_eq!(s.var_names(), vec!["b".to_string(), "a".to_string()]);
    }
}
