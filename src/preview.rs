use colored::Colorize;

use crate::tree::{Directory, Node};

const DUMP_INDENT: &str = "    ";

/// Renders the tree in indentation format: four spaces per level, `/` after
/// directory names, and `// content:` annotations for seeded files.
///
/// The output parses back into the same tree, as long as no file name lacks a `.`.
pub fn render_tree(root: &Directory) -> String {
    let mut out = format!("{}/\n", root.name);

    for (depth, node) in root.depth_first() {
        let indent = DUMP_INDENT.repeat(depth);

        let line = match node {
            Node::Directory(dir) => format!("{}{}/\n", indent, dir.name),
            Node::File(file) => match file.content.as_deref() {
                Some(content) if !content.is_empty() => {
                    format!("{}{} // content: {}\n", indent, file.name, content)
                }
                _ => format!("{}{}\n", indent, file.name),
            },
        };

        out.push_str(&line);
    }

    out
}

/// Print the tree with a nice ASCII style.
fn print_tree(node: &Node, prefix: &str, is_last: bool) {
    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };

    let name = match node {
        Node::Directory(dir) => format!("{}/", dir.name).blue(),
        Node::File(file) => match &file.content {
            Some(content) => format!("{} ({} bytes)", file.name, content.len()).green(),
            None => file.name.green(),
        },
    };

    println!("{}{}{}", prefix.yellow(), connector, name);

    let Node::Directory(dir) = node else {
        return;
    };

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = dir.children.len();
    for (i, child) in dir.children.iter().enumerate() {
        print_tree(child, &child_prefix, i == len - 1);
    }
}

/// Prints a coloured preview of the parsed tree, used by `--debug`.
pub fn preview_as_tree(root: &Directory) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Parsed tree".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    println!("{}", format!("{}/", root.name).blue());

    let len = root.children.len();
    for (i, child) in root.children.iter().enumerate() {
        print_tree(child, "", i == len - 1);
    }

    println!(
        "\n{} {}\n",
        "└─".bold().bright_blue(),
        format!("{} entries", root.len()).bright_green()
    );
}
