use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use super::utils::{clog2, get_enum_encode_value, get_enum_width, get_member_symbol};

pub(super) fn derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let name = &ast.ident;
    match ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(syn::FieldsNamed { ref named, .. }), ..
        }) => {
            let fields = named;

            let ty_widths = fields.iter().map(|f| {
                let ty = &f.ty;
                quote! { <#ty as ::softflow::Signal>::WIDTH }
            });

            // fields for `transl`.
            let transl_fields = fields.iter().map(|f| {
                let name = &f.ident;
                quote! { bits.extend(::softflow::Signal::transl(&self.#name)); }
            });

            // fields for `port_decls`.
            let port_decls_fields = fields.iter().map(|f| {
                let name = f.ident.as_ref().expect("named field");
                let ty = &f.ty;

                match get_member_symbol(&f.attrs, name) {
                    None => quote! { (None, <#ty as ::softflow::Signal>::port_decls()) },
                    Some(symbol) => quote! { (Some(#symbol.to_string()), <#ty as ::softflow::Signal>::port_decls()) },
                }
            });

            let expanded = quote! {
                impl #impl_generics ::softflow::Signal for #name #ty_generics #where_clause {
                    const WIDTH: usize = 0 #(+ #ty_widths)*;

                    fn transl(&self) -> ::std::vec::Vec<bool> {
                        let mut bits = ::std::vec::Vec::with_capacity(<Self as ::softflow::Signal>::WIDTH);
                        #(#transl_fields)*
                        bits
                    }

                    fn port_decls() -> ::softflow::PortDecls {
                        ::softflow::PortDecls::Struct(::std::vec![#(#port_decls_fields,)*])
                    }
                }
            };

            expanded.into()
        }
        syn::Data::Enum(syn::DataEnum { ref variants, .. }) => {
            let variant_count = variants.len();
            assert!(variant_count > 0, "{}: empty enums cannot be derived as `Signal`", name);

            let width = match get_enum_width(&ast.attrs) {
                Some(width) => {
                    width.base10_parse::<usize>().unwrap_or_else(|_| panic!("{}: enum width should be usize", name))
                }
                None if variant_count == 1 => 1,
                None => clog2(variant_count),
            };

            let encode_variants = variants.iter().enumerate().map(|(i, v)| {
                let variant_name = &v.ident;
                assert!(
                    matches!(v.fields, syn::Fields::Unit),
                    "{}::{}: only unit variants can be derived as `Signal`",
                    name,
                    variant_name
                );

                let encode_value = match get_enum_encode_value(&v.attrs) {
                    Some(lit) => lit.base10_parse::<usize>().unwrap_or_else(|_| {
                        panic!("encoding value of {}::{} should be usize", name, variant_name)
                    }),
                    None => i,
                };
                assert!(
                    encode_value < (1 << width),
                    "{} (encoding of {}::{}) exceeds maximum for {} bits",
                    encode_value,
                    name,
                    variant_name,
                    width
                );

                quote! { Self::#variant_name => #encode_value, }
            });

            let expanded = quote! {
                impl #impl_generics ::softflow::Signal for #name #ty_generics #where_clause {
                    const WIDTH: usize = #width;

                    fn transl(&self) -> ::std::vec::Vec<bool> {
                        let value: usize = match self {
                            #(#encode_variants)*
                        };
                        (0..#width).map(|idx| ((value >> idx) & 1) != 0).collect()
                    }

                    fn port_decls() -> ::softflow::PortDecls {
                        ::softflow::PortDecls::Bits(#width)
                    }
                }
            };

            expanded.into()
        }
        _ => todo!("Signal macro is not implemented for union type"),
    }
}
