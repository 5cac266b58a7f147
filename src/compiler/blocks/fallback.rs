// src/compiler/blocks/fallback.rs
//! Placeholder for block kinds without a document mapping.

use crate::compiler::Compiled;

pub fn unsupported(block_type: &str, offset: usize) -> Compiled {
    let mut result = Compiled::empty();
    result.insert(offset, format!("[Unsupported block type: {}]\n", block_type));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_names_kind() {
        let compiled = unsupported("embed", 3);
        assert_eq!(compiled.length, "[Unsupported block type: embed]\n".len());
    }
}
