/// counts the live processes in a `/proc` listing.
///
/// each process has a directory named by its pid, so only purely numeric names are counted.
pub fn count_processes<I, S>(entries: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let count = entries
        .into_iter()
        .filter(|name| is_pid(name.as_ref()))
        .count();

    u32::try_from(count).unwrap_or(u32::MAX)
}

fn is_pid(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}
