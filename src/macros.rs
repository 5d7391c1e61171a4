/// Handy macro to construct an [`AHashMap`](ahash::AHashMap)
///
/// Example:
///
/// ```rust
/// # use safehtml::hashmap;
/// # use ahash::AHashMap;
/// let _: AHashMap<_, AHashMap<_, _>> = hashmap! [
///     "key" => hashmap![],
///     "key2" => hashmap![
///         "inner key" => "inner value",
///     ],
/// ];
/// ```
#[macro_export]
macro_rules! hashmap {
    ($($key:expr => $value:expr),*$(,)?) => {{
        let mut hashmap = ::ahash::AHashMap::default();

        $(
            let _ = hashmap.insert($key, $value);
        )*

        hashmap
    }}
}

/// Handy macro to construct an [`AHashSet`](ahash::AHashSet)
///
/// Example:
///
/// ```rust
/// # use safehtml::hashset;
/// # use ahash::AHashSet;
/// let _ : AHashSet<_> = hashset![
///     "key1",
///     "key2",
///     "key3",
/// ];
/// ```
#[macro_export]
macro_rules! hashset {
    ($($value:expr),*$(,)?) => {{
        let mut hashset = ::ahash::AHashSet::default();

        $(
            let _ = hashset.insert($value);
        )*

        hashset
    }}
}
