//! Utilities for unidirectional channels.

use crate::*;

channel! {
    /// Unidirectional channel. The consumer has no backpressure.
    UniChannel<V: Signal>, V, ()
}
