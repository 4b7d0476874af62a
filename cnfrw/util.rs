#[cfg(test)]
#[macro_export]
macro_rules! btreeset {
    ( $( $x:expr ),* ) => {
        {
            use std::collections::BTreeSet;
            #[allow(unused_mut)]
            let mut temp_btreeset = BTreeSet::new();
            $(
                temp_btreeset.insert($x);
            )*
            temp_btreeset
        }
    };
}

/// Split a line on whitespace.
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Strip trailing line terminators.
pub(crate) fn trim_newline(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
