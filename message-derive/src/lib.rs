use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Implements `NativeObject` for a struct with named fields, exposing it as a named aggregate
/// whose sealed fields are the struct fields in declaration order.
///
/// The wire class name defaults to the struct name and can be set with
/// `#[native(alias = "com.example.Point")]`. Every field must be `Clone + Into<Value>`.
#[proc_macro_derive(NativeObject, attributes(native))]
pub fn derive_native_object(input: TokenStream) -> TokenStream {
  let input = parse_macro_input!(input as DeriveInput);
  match expand(&input) {
    Ok(tokens) => tokens.into(),
    Err(error) => error.to_compile_error().into(),
  }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
  let name = &input.ident;
  let mut alias = name.to_string();
  for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("native")) {
    attr.parse_nested_meta(|meta| {
      if meta.path.is_ident("alias") {
        alias = meta.value()?.parse::<LitStr>()?.value();
        Ok(())
      } else {
        Err(meta.error("unsupported native attribute"))
      }
    })?;
  }

  let fields = match &input.data {
    Data::Struct(data) => match &data.fields {
      Fields::Named(fields) => &fields.named,
      _ => {
        return Err(syn::Error::new_spanned(
          name,
          "NativeObject can only be derived for structs with named fields",
        ))
      }
    },
    _ => {
      return Err(syn::Error::new_spanned(
        name,
        "NativeObject can only be derived for structs",
      ))
    }
  };
  let field_idents = fields.iter().filter_map(|field| field.ident.as_ref()).collect::<Vec<_>>();
  let field_names = field_idents.iter().map(|ident| ident.to_string()).collect::<Vec<_>>();
  let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

  Ok(quote! {
      impl #impl_generics ::nexus_amf_core_rs::value::NativeObject for #name #ty_generics #where_clause {
          fn type_descriptor(&self) -> ::nexus_amf_core_rs::registry::TypeDescriptor {
              ::nexus_amf_core_rs::registry::TypeDescriptor::named(#alias)
                  .with_capability(::nexus_amf_core_rs::registry::Capability::NamedAggregate)
          }

          fn eq_native(&self, other: &dyn ::nexus_amf_core_rs::value::NativeObject) -> bool {
              other.as_any().downcast_ref::<Self>()
                  .map_or(false, |other| self == other)
          }

          fn as_any(&self) -> &(dyn std::any::Any + Send + Sync + 'static) {
              self
          }

          fn view(
              &self,
              capability: ::nexus_amf_core_rs::registry::Capability,
          ) -> Option<::nexus_amf_core_rs::registry::Decomposed> {
              if capability != ::nexus_amf_core_rs::registry::Capability::NamedAggregate {
                  return None;
              }
              let traits = ::nexus_amf_core_rs::value::TraitInfo::sealed(
                  #alias,
                  vec![#(#field_names.to_string()),*],
              );
              let values = vec![#(::nexus_amf_core_rs::value::Value::from(self.#field_idents.clone())),*];
              Some(::nexus_amf_core_rs::registry::Decomposed::Aggregate(
                  ::nexus_amf_core_rs::value::TypedObject::from_parts(traits, values, Vec::new()),
              ))
          }
      }
  })
}
