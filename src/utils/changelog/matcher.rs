// fragment matcher

use super::types::FragmentCandidate;

/// find the file added as a changelog fragment
///
/// a file matches a directory when its path is exactly `<directory><digits>...`.
/// directories are tried in the given order and files in the order the
/// pull request reports them; the first hit wins
pub fn find_fragment<S: AsRef<str>>(
    changed_files: &[S],
    directories: &[String],
) -> Option<FragmentCandidate> {
    for directory in directories {
        let mut directory = directory.clone();
        if !directory.ends_with('/') {
            directory.push('/');
        }

        for file in changed_files {
            let file = file.as_ref();
            if starts_with_number_under(file, &directory) {
                return Some(FragmentCandidate::new(file, directory));
            }
        }
    }

    None
}

fn starts_with_number_under(path: &str, directory: &str) -> bool {
    path.strip_prefix(directory)
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}
