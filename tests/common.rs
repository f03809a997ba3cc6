use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

pub fn poemario() -> Command {
    cargo_bin_cmd!("poemario")
}

/// Write a well-formed document under `textos/` and return its
/// root-relative path
#[allow(dead_code)]
pub fn write_document(root: &Path, name: &str, extra_meta: &str) -> String {
    let content = format!(
        "{extra_meta}POETA: Alejandra Pizarnik\n\
         POEM_TITLE: El despertar\n\
         MI_TITULO: Vigilia\n\
         \n\
         # POEMA\n\
         la noche cerrada\n\
         sobre la casa vacia\n\
         \n\
         # POEMA_CITADO\n\
         La jaula se ha vuelto pajaro\n\
         \n\
         # TEXTO\n\
         El poema dialoga con la imagen de la jaula y el encierro.\n"
    );
    let dir = root.join("textos");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
    format!("textos/{}", name)
}

/// Write a flat JSON candidate list with `count` distinct weight-1
/// words and return its root-relative path
#[allow(dead_code)]
pub fn write_candidates(root: &Path, name: &str, count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| format!(r#"{{"word": "palabra{}", "weight": 1}}"#, i))
        .collect();
    fs::write(root.join(name), format!("[{}]\n", items.join(", "))).unwrap();
    name.to_string()
}
