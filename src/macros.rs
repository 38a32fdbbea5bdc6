#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// `is!("chuva", "baixa")` is a leaf antecedent.
#[macro_export]
macro_rules! is {
    ($var:expr, $term:expr $(,)?) => {
        $crate::Antecedent::is($var, $term)
    };
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        when: $when:expr,
        then: ($var:expr, $term:expr)
        $(,)?
    ) => {{
        $crate::Rule {
            name: ::std::string::String::from($name),
            when: $when,
            then: $crate::Consequent::new($var, $term),
        }
    }};
}
