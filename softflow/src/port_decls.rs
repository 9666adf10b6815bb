use std::collections::VecDeque;

use crate::utils::join_options;

/// Port declarations of a value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortDecls {
    /// Collection of ports.
    Struct(Vec<(Option<String>, PortDecls)>),

    /// Single port which contains its width.
    Bits(usize),
}

impl PortDecls {
    /// Width of `PortDecls`.
    pub fn width(&self) -> usize {
        match self {
            PortDecls::Struct(inner) => inner.iter().map(|(_, m)| m.width()).sum(),
            PortDecls::Bits(width) => *width,
        }
    }

    /// Iterator for `PortDecls`.
    ///
    /// # Note
    ///
    /// The iterator returns (name, width) for inner fields **ONLY** with nonzero width.
    /// This is to ignore meaningless unit types. (e.g. the backward signal of `UniChannel`)
    pub fn iter(&self) -> PortIter { self.flatten(None) }

    /// Flattens the ports, joining member names with `_` under the given prefix.
    pub fn flatten(&self, prefix: Option<String>) -> PortIter {
        let mut ports = VecDeque::new();
        self.flatten_into(prefix, &mut ports);
        PortIter { inner: ports }
    }

    fn flatten_into(&self, prefix: Option<String>, ports: &mut VecDeque<(Option<String>, usize)>) {
        match self {
            PortDecls::Struct(inner) => {
                for (name, member) in inner {
                    member.flatten_into(join_options("_", [prefix.clone(), name.clone()]), ports);
                }
            }
            PortDecls::Bits(width) => {
                if *width > 0 {
                    ports.push_back((prefix, *width));
                }
            }
        }
    }
}

impl IntoIterator for &PortDecls {
    type IntoIter = PortIter;
    type Item = (Option<String>, usize);

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// Iterator for `PortDecls`.
#[derive(Debug)]
pub struct PortIter {
    inner: VecDeque<(Option<String>, usize)>,
}

impl Iterator for PortIter {
    type Item = (Option<String>, usize);

    fn next(&mut self) -> Option<Self::Item> { self.inner.pop_front() }
}
