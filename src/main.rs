use anyhow::{bail, Result};
use markpad::app::App;
use markpad::config::EditorConfig;
use markpad::terminal::Terminal;
use markpad::utils;
use std::path::PathBuf;

const HELP: &str = "\
markpad - a plain-text code editor with Emacs-style mark editing

USAGE:
  markpad [OPTIONS] [FILE]

OPTIONS:
  --read-only         Open in read-only navigation mode
  --tab-width N       Indent width in spaces (default: 4)
  --debug             Enable debug logging
  -h, --help          Print help
  -V, --version       Print version

KEYBOARD SHORTCUTS:

  Files:
    Ctrl+S              Save file
    Ctrl+Q              Quit (press twice if modified)
    Alt+Q               Toggle read-only mode

  Mark & selection:
    Ctrl+Space          Set mark (again to collapse or unset)
    Alt+X               Exchange mark and cursor
    Alt+A               Select all
    Esc                 Deactivate mark

  Navigation:
    Ctrl+F/B  Alt+F/B   Char / word forward and backward
    Ctrl+N/P            Next / previous line
    Ctrl+A/E            Line start / end
    Alt+M               Line indentation
    Alt+P/N             Forward / backward pair
    Ctrl+Home/End       Document start / end
    Ctrl+L              Go to line number

  Editing:
    Ctrl+Return         Open line below (Ctrl+Shift+Return: above)
    Ctrl+Shift+D        Duplicate line
    Ctrl+Shift+Up/Down  Move line up / down
    Ctrl+Shift+J        Join lines
    Ctrl+K              Kill line (Ctrl+Shift+K: whole line)
    Alt+Backspace/D     Kill word backward / forward
    Tab / Shift+Tab     Indent / unindent
    Alt+U/L/C           Upcase / downcase / capitalize word
    Ctrl+T              Transpose characters
    Ctrl+/              Toggle comment
    Ctrl+Z/Y            Undo / redo

  Clipboard:
    Ctrl+C/X/V          Copy / cut / paste
    Ctrl+Shift+C/X      Copy / cut lines

  Search:
    Ctrl+G              Find text
    F3 / Shift+F3       Next / previous match
    Ctrl+R              Replace
";

#[derive(Debug)]
struct Args {
    file: Option<PathBuf>,
    debug: bool,
    read_only: bool,
    tab_width: Option<usize>,
}

/// 解析命令列；回傳 None 代表已印出說明或版本
fn parse_args() -> Result<Option<Args>> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(None);
    }
    if pargs.contains(["-V", "--version"]) {
        println!("markpad {}", env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }

    let debug = pargs.contains("--debug");
    let read_only = pargs.contains("--read-only");
    let tab_width: Option<usize> = pargs.opt_value_from_str("--tab-width")?;

    let mut free = pargs.finish().into_iter();
    let file = match free.next() {
        Some(arg) if arg.to_string_lossy().starts_with('-') => {
            bail!("Unknown option: {}", arg.to_string_lossy())
        }
        Some(arg) => Some(PathBuf::from(arg)),
        None => None,
    };
    if let Some(extra) = free.next() {
        bail!("Unexpected argument: {}", extra.to_string_lossy());
    }

    Ok(Some(Args {
        file,
        debug,
        read_only,
        tab_width,
    }))
}

fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    // 初始化日誌
    utils::init_logger(args.debug);

    let mut config = EditorConfig::default();
    if let Some(tab_width) = args.tab_width {
        if tab_width == 0 {
            bail!("--tab-width must be at least 1");
        }
        config.tab_width = tab_width;
    }

    let mut app = App::new(args.file.as_deref(), config, args.read_only)?;

    // 設置 panic hook 以確保終端正常恢復
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = Terminal::exit_raw_mode();
        let _ = Terminal::show_cursor();
        original_hook(panic_info);
    }));

    app.run()?;

    Ok(())
}
