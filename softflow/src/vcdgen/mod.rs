//! Value change dump (VCD) generation.
//!
//! Signals are registered as probes before the first [`Vcdgen::tick`], sampled once per cycle, and
//! emitted as value changes at every tick.

use std::fmt;
use std::io::{self, Write};

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;
use thiserror::Error;

use crate::*;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum VcdError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("probe {scope}.{name} registered after the header was written")]
    ProbeAfterHeader { scope: String, name: String },

    #[error("sampled value has {found} bits, but the probe has {expected}")]
    WidthMismatch { expected: usize, found: usize },
}

/// Handle of a registered signal.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Variables of the probe, one per flattened port.
    vars: Vec<usize>,
    width: usize,
}

impl Probe {
    /// Total bit width of the probed signal.
    pub fn width(&self) -> usize { self.width }
}

#[derive(Debug)]
struct Var {
    name: String,
    width: usize,
    code: String,
    value: Vec<bool>,
    dumped: Option<Vec<bool>>,
}

/// VCD writer.
pub struct Vcdgen<W: Write> {
    writer: W,
    timescale: String,
    /// Variable indices of each scope, in registration order.
    scopes: LinkedHashMap<String, Vec<usize>>,
    vars: Vec<Var>,
    time: u64,
    header_written: bool,
}

/// Returns the identifier code of the `index`-th variable.
///
/// Codes are printable ASCII characters from `!` to `~`, extended with more characters as needed.
fn id_code(mut index: usize) -> String {
    const BASE: usize = (b'~' - b'!' + 1) as usize;

    let mut code = String::new();
    loop {
        code.push(char::from(b'!' + (index % BASE) as u8));
        index /= BASE;
        if index == 0 {
            break code;
        }
        index -= 1;
    }
}

impl<W: Write> fmt::Debug for Vcdgen<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vcdgen").field("timescale", &self.timescale).field("vars", &self.vars.len()).field("time", &self.time).finish()
    }
}

impl<W: Write> Vcdgen<W> {
    /// Creates a new VCD writer with the given timescale (e.g., `1ns`).
    pub fn new(writer: W, timescale: &str) -> Self {
        Self {
            writer,
            timescale: timescale.to_string(),
            scopes: LinkedHashMap::new(),
            vars: Vec::new(),
            time: 0,
            header_written: false,
        }
    }

    /// Registers every flattened port of `V` as a variable named `name` (and its port names) under `scope`.
    pub fn probe<V: Signal>(&mut self, scope: &str, name: &str) -> Result<Probe, VcdError> {
        if self.header_written {
            return Err(VcdError::ProbeAfterHeader { scope: scope.to_string(), name: name.to_string() });
        }

        let mut vars = Vec::new();
        for (port, width) in V::port_decls().flatten(Some(name.to_string())) {
            let index = self.vars.len();
            self.vars.push(Var {
                name: some_or!(port, name.to_string()),
                width,
                code: id_code(index),
                value: vec![false; width],
                dumped: None,
            });
            vars.push(index);
        }
        self.scopes.entry(scope.to_string()).or_insert_with(Vec::new).extend(vars.iter().copied());

        Ok(Probe { vars, width: V::WIDTH })
    }

    /// Registers the forward and backward signals of interface `I`.
    pub fn probe_interface<I: Interface>(&mut self, scope: &str, name: &str) -> Result<(Probe, Probe), VcdError> {
        Ok((self.probe::<I::Fwd>(scope, name)?, self.probe::<I::Bwd>(scope, name)?))
    }

    /// Records the value of a probe for the current cycle.
    pub fn sample<V: Signal>(&mut self, probe: &Probe, value: &V) -> Result<(), VcdError> {
        let bits = value.transl();
        if bits.len() != probe.width {
            return Err(VcdError::WidthMismatch { expected: probe.width, found: bits.len() });
        }

        let mut offset = 0;
        for index in &probe.vars {
            let var = &mut self.vars[*index];
            var.value.copy_from_slice(&bits[offset..offset + var.width]);
            offset += var.width;
        }
        Ok(())
    }

    /// Current time.
    pub fn time(&self) -> u64 { self.time }

    fn write_header(&mut self) -> io::Result<()> {
        log::debug!("vcdgen: {} variables in {} scopes", self.vars.len(), self.scopes.len());
        writeln!(self.writer, "$version softflow vcdgen $end")?;
        writeln!(self.writer, "$timescale {} $end", self.timescale)?;
        for (scope, vars) in &self.scopes {
            writeln!(self.writer, "$scope module {} $end", scope)?;
            for index in vars {
                let var = &self.vars[*index];
                writeln!(self.writer, "$var wire {} {} {} $end", var.width, var.code, var.name)?;
            }
            writeln!(self.writer, "$upscope $end")?;
        }
        writeln!(self.writer, "$enddefinitions $end")?;
        self.header_written = true;
        Ok(())
    }

    /// Emits the values changed since the last tick at the current time, then advances the time by one.
    pub fn tick(&mut self) -> Result<(), VcdError> {
        if !self.header_written {
            self.write_header()?;
        }

        let changed = self.vars.iter().filter(|var| var.dumped.as_ref() != Some(&var.value)).collect::<Vec<_>>();
        if !changed.is_empty() {
            writeln!(self.writer, "#{}", self.time)?;
            for var in changed {
                if var.width == 1 {
                    writeln!(self.writer, "{}{}", u8::from(var.value[0]), var.code)?;
                } else {
                    let bits = var.value.iter().rev().map(|b| if *b { '1' } else { '0' }).join("");
                    writeln!(self.writer, "b{} {}", bits, var.code)?;
                }
            }
        }

        for var in &mut self.vars {
            var.dumped = Some(var.value.clone());
        }
        self.time += 1;
        Ok(())
    }

    /// Writes the final timestamp and flushes the writer.
    pub fn finish(mut self) -> Result<W, VcdError> {
        if !self.header_written {
            self.write_header()?;
        }
        writeln!(self.writer, "#{}", self.time)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Signal)]
    struct Beat {
        #[member(name = "")]
        data: u8,
        last: bool,
    }

    #[test]
    fn id_codes() {
        assert_eq!(id_code(0), "!");
        assert_eq!(id_code(93), "~");
        assert_eq!(id_code(94), "!!");
        assert_eq!(id_code(95), "\"!");
    }

    #[test]
    fn dumps_only_changes() -> Result<(), VcdError> {
        let mut vcd = Vcdgen::new(Vec::new(), "1ns");
        let req = vcd.probe::<bool>("top", "req")?;
        let beat = vcd.probe::<Beat>("top", "beat")?;

        vcd.sample(&req, &true)?;
        vcd.sample(&beat, &Beat { data: 5, last: false })?;
        vcd.tick()?;
        vcd.tick()?;
        vcd.sample(&req, &false)?;
        vcd.tick()?;

        assert!(matches!(vcd.probe::<bool>("top", "late"), Err(VcdError::ProbeAfterHeader { .. })));
        assert!(matches!(vcd.sample(&req, &3_u8), Err(VcdError::WidthMismatch { expected: 1, found: 8 })));

        let out = String::from_utf8(vcd.finish()?).unwrap();
        let expected = "\
$version softflow vcdgen $end
$timescale 1ns $end
$scope module top $end
$var wire 1 ! req $end
$var wire 8 \" beat $end
$var wire 1 # beat_last $end
$upscope $end
$enddefinitions $end
#0
1!
b00000101 \"
0#
#2
0!
#3
";
        assert_eq!(out, expected);
        Ok(())
    }
}
