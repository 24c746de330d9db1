//! Executable shell scripts standing in for external tools in tests.

use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Write `body` as an executable `/bin/sh` script named `name` in `dir`.
pub(crate) fn write_fake_program(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o755)
        .open(&path)
        .unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.sync_all().unwrap();
    path
}

/// `pdftoppm` stand-in writing pages 01, 02 and 10 whose content is the
/// requested dpi. PDFs whose path contains "broken" fail the way poppler
/// does.
pub(crate) fn fake_pdftoppm(dir: &Path) -> String {
    let path = write_fake_program(
        dir,
        "pdftoppm",
        r#"[ "$1" = "-r" ] && [ "$3" = "-png" ] || exit 99
case "$4" in
  *broken*) echo "Syntax Error: Couldn't find trailer dictionary" >&2; exit 1 ;;
esac
for n in 01 02 10; do printf '%s' "$2" > "$5-$n.png"; done
"#,
    );
    path.to_string_lossy().into_owned()
}
