use proc_macro2::TokenStream;

use crate::derive_data::ReflectMeta;

/// Submits the type to the `inventory` collected by
/// `TypeRegistry::auto_register`.
///
/// Generic types are skipped, there is no single type to register.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> TokenStream {
    use quote::quote;

    if meta.attrs.auto_register.is_none() || meta.is_generic() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(&meta.op_reflect);
    let ident = meta.ident;

    quote! {
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_meta: &ReflectMeta) -> TokenStream {
    TokenStream::new()
}
