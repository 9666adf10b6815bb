use std::fmt::Debug;

use thiserror::Error;

use crate::PortDecls;

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("width mismatch: expected {expected} bits, found {found}")]
    WidthMismatch { expected: usize, found: usize },
}

/// Bit-representable values.
pub trait Signal: 'static + Debug + Clone {
    /// Signal's bit width.
    ///
    /// # Note
    ///
    /// `Self::WIDTH` and `Self::port_decls().width()` should be equal.
    const WIDTH: usize;

    /// Bits of the value, least significant bit first.
    fn transl(&self) -> Vec<bool>;

    /// Port names and bitwidths.
    ///
    /// A channel carrying this value is represented by multiple wires combined. `port_decls` stores the
    /// name and width of these wires, in the same order as `transl()`.
    ///
    /// # Example
    ///
    /// Port declarations of `Valid<Strobed<8>>` are as follows:
    ///
    /// ```ignore
    /// Struct([
    ///     (None, Struct([(Some("data"), Bits(64)), (Some("strb"), Bits(8))])),
    ///     (Some("valid"), Bits(1)),
    /// ])
    /// ```
    fn port_decls() -> PortDecls;
}

impl Signal for () {
    const WIDTH: usize = 0;

    fn transl(&self) -> Vec<bool> { vec![] }

    fn port_decls() -> PortDecls { PortDecls::Bits(0) }
}

impl Signal for bool {
    const WIDTH: usize = 1;

    fn transl(&self) -> Vec<bool> { vec![*self] }

    fn port_decls() -> PortDecls { PortDecls::Bits(1) }
}

macro_rules! impl_signal_tuple {
    ($($a:ident $idx:tt)+) => {
        impl<$($a: Signal,)+> Signal for ($($a,)+) {
            const WIDTH: usize = 0 $(+ <$a as Signal>::WIDTH)+;

            fn transl(&self) -> Vec<bool> {
                let mut bits = Vec::with_capacity(Self::WIDTH);
                $(bits.extend(self.$idx.transl());)+
                bits
            }

            fn port_decls() -> PortDecls {
                PortDecls::Struct(vec![$((Some(stringify!($idx).to_string()), <$a as Signal>::port_decls()),)+])
            }
        }
    };
}

impl_signal_tuple! { V1 0 }
impl_signal_tuple! { V1 0 V2 1 }
impl_signal_tuple! { V1 0 V2 1 V3 2 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 V6 5 }

macro_rules! impl_signal {
    ($typ:ty) => {
        impl Signal for $typ {
            const WIDTH: usize = ::std::mem::size_of::<$typ>() * 8;

            fn transl(&self) -> Vec<bool> {
                #[allow(trivial_numeric_casts)]
                (0..Self::WIDTH).map(|i| (*self & ((1 as $typ) << i)) != 0).collect::<Vec<_>>()
            }

            fn port_decls() -> PortDecls { PortDecls::Bits(Self::WIDTH) }
        }
    };
}

impl_signal!(u8);
impl_signal!(u16);
impl_signal!(u32);
impl_signal!(u64);
impl_signal!(usize);

/// Arrays are laid out element by element, each element's ports prefixed by its index.
impl<V: Signal, const N: usize> Signal for [V; N] {
    const WIDTH: usize = V::WIDTH * N;

    fn transl(&self) -> Vec<bool> { self.iter().flat_map(Signal::transl).collect() }

    fn port_decls() -> PortDecls { PortDecls::Struct((0..N).map(|i| (Some(i.to_string()), V::port_decls())).collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bits_are_lsb_first() {
        assert_eq!(0b1011_u8.transl(), vec![true, true, false, true, false, false, false, false]);
        assert_eq!(<u32 as Signal>::WIDTH, 32);
    }

    #[test]
    fn tuple_ports_are_indexed() {
        let value = (true, 3_u8);
        assert_eq!(<(bool, u8)>::WIDTH, 9);
        assert_eq!(value.transl().len(), 9);
        assert_eq!(
            <(bool, u8)>::port_decls().iter().collect::<Vec<_>>(),
            vec![(Some("0".to_string()), 1), (Some("1".to_string()), 8)]
        );
    }

    #[test]
    fn array_width_matches_port_decls() {
        assert_eq!(<[u16; 3]>::WIDTH, 48);
        assert_eq!(<[u16; 3]>::port_decls().width(), 48);
        assert!([1_u16, 0, 0].transl()[0]);
        assert!([0_u16, 1, 0].transl()[16]);
    }
}
