pub const PIPELINE_LABEL: &str = " Pipeline";
pub const PIPELINE_LAYOUT_LABEL: &str = " Pipeline Layout";
pub const VERT_ATTR_LABEL: &str = " Vertex Attribute";
pub const INDEX_LABEL: &str = " Vertex Index";
pub const BIND_GROUP_LABEL: &str = " Bind Group";
pub const BIND_GROUP_LAYOUT_LABEL: &str = " Bind Group Layout";
pub const BUFFER_LABEL: &str = " Buffer";
pub const TEXTURE_LABEL: &str = " Texture";
pub const TEXTURE_VIEW_LABEL: &str = " Texture View";
pub const SAMPLER_LABEL: &str = " Sampler";
pub const SHADER_LABEL: &str = " Shader";

pub const UNNAMED: &str = "Unnamed";

/// `name` (or [`UNNAMED`]) followed by every postfix.
pub fn get_default_label<'a>(
    name: &Option<&'a str>,
    postfixs: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let mut s = name.unwrap_or(UNNAMED).to_owned();
    s.extend(postfixs);
    Some(s)
}
