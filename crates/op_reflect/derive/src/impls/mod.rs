mod auto_register;
mod instantiate;
mod reflect;
mod typed;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

pub(crate) fn impl_derive(derive: &ReflectDerive) -> TokenStream {
    match derive {
        ReflectDerive::Struct(data) => {
            let where_clause = data.where_clause();
            let typed = typed::impl_struct_typed(data, &where_clause);
            let reflect = reflect::impl_struct_reflect(data, &where_clause);
            let instantiate = instantiate::impl_struct_instantiate(data, &where_clause);
            let auto_register = auto_register::get_auto_register_impl(&data.meta);

            quote! {
                #typed
                #reflect
                #instantiate
                #auto_register
            }
        }
        ReflectDerive::Enum(data) => {
            let where_clause = data.where_clause();
            let typed = typed::impl_enum_typed(data, &where_clause);
            let reflect = reflect::impl_enum_reflect(data, &where_clause);
            let instantiate = instantiate::impl_enum_instantiate(data, &where_clause);
            let auto_register = auto_register::get_auto_register_impl(&data.meta);

            quote! {
                #typed
                #reflect
                #instantiate
                #auto_register
            }
        }
    }
}
