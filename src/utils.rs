use anyhow::{anyhow, Result};

/// Setter for an `Option` field of a builder, chainable through `&mut Self`.
macro_rules! builder_set_fn {
    ($fn_name:ident, $field:ident, $t:ty) => {
        pub fn $fn_name(&mut self, $field: $t) -> &mut Self {
            self.$field = Some($field);
            self
        }
    };
}
pub(crate) use builder_set_fn;

/// Unwraps a builder field that must have been set before `build`.
pub fn required<T>(field: Option<T>, name: &str) -> Result<T> {
    field.ok_or_else(|| anyhow!("builder field `{}` is not set", name))
}
