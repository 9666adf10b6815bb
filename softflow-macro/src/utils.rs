use proc_macro2::Span;
use syn::{Attribute, Ident, Lit, LitInt, LitStr};

fn get_list_lit_int(attrs: &[Attribute], key: &str) -> Option<LitInt> {
    for attr in attrs {
        if let Ok(syn::Meta::List(nvs)) = attr.parse_meta() {
            if nvs.path.is_ident(key) {
                return nvs.nested.iter().find_map(|nv| match nv {
                    syn::NestedMeta::Lit(syn::Lit::Int(value)) => Some(value.clone()),
                    _ => None,
                });
            }
        }
    }
    None
}

pub(super) fn get_enum_width(attrs: &[Attribute]) -> Option<LitInt> { get_list_lit_int(attrs, "width") }

pub(super) fn get_enum_encode_value(attrs: &[Attribute]) -> Option<LitInt> { get_list_lit_int(attrs, "encode") }

/// Returns the port name of a struct member.
///
/// `#[member(name = "")]` removes the member's own name so its ports are flattened into the parent.
pub(super) fn get_member_symbol(attrs: &[Attribute], name: &Ident) -> Option<LitStr> {
    let default = LitStr::new(&name.to_string(), Span::call_site());

    for attr in attrs {
        let nvs = match attr.parse_meta() {
            Ok(syn::Meta::List(nvs)) if nvs.path.is_ident("member") => nvs,
            _ => continue,
        };

        let symbol = nvs.nested.iter().find_map(|nv| match nv {
            syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("name") => Some(nv.lit.clone()),
            _ => None,
        });

        return match symbol {
            None => Some(default),
            Some(Lit::Str(s)) if s.value().is_empty() => None,
            Some(Lit::Str(s)) => Some(s),
            Some(lit) => panic!("{}: expected string for member name, found {:?}", name, lit),
        };
    }

    Some(default)
}

pub(super) fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}
