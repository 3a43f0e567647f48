/// Suffix-rule pluralization. The `f` branch is checked before `fe`.
pub fn pluralize(word: &str) -> String {
    if ["s", "sh", "ch", "x", "z"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        format!("{word}es")
    } else if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !"aeiou".contains(c))
    {
        format!("{stem}ies")
    } else if let Some(stem) = word.strip_suffix('f') {
        format!("{stem}ves")
    } else if let Some(stem) = word.strip_suffix("fe") {
        format!("{stem}ves")
    } else {
        format!("{word}s")
    }
}

/// Lower-cases the first character only.
pub fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn field_name(type_name: &str, plural: bool) -> String {
    if plural {
        decapitalize(&pluralize(type_name))
    } else {
        decapitalize(type_name)
    }
}

/// `UserProfile` → `user_profile`, `ID` → `i_d`: every interior uppercase
/// letter gets an underscore, consecutive ones included.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "record", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "var", "void", "volatile", "while", "yield",
];

/// Keywords, literals and restricted identifiers that can't safely name a local.
pub fn is_java_reserved(word: &str) -> bool {
    JAVA_RESERVED.contains(&word)
}
