// tabula Configuration
// Compiled-in defaults. Anything here can be overridden from ~/.tabularc
// ("tab-stop = 4", "bind ^T = next-buffer") or the command line.

use crate::config::Config;

/// User configuration function
pub fn configure(config: &mut Config) {
    // Keybindings - tabula defaults
    // Files & buffers
    config.bind("^Q", "quit");
    config.bind("^S", "save-buffer");
    config.bind("^A", "write-file"); // save under a new name
    config.bind("^O", "open-file");
    config.bind("^N", "new-buffer");
    config.bind("^B", "next-buffer");
    config.bind("^W", "close-buffer");

    // Search
    config.bind("^F", "find");

    // Mark & Region
    config.bind("C-SPC", "toggle-mark"); // also what C-@ decodes to
    config.bind("^K", "copy-region");
    config.bind("^X", "cut-region");
    config.bind("^V", "paste");

    // Undo
    config.bind("^Z", "undo");
    config.bind("^Y", "redo");

    // Movement
    config.bind("Left", "backward-character");
    config.bind("Right", "forward-character");
    config.bind("Up", "previous-line");
    config.bind("Down", "next-line");
    config.bind("Home", "beginning-of-line");
    config.bind("End", "end-of-line");
    config.bind("PageUp", "backward-page");
    config.bind("PageDown", "forward-page");

    // Editing
    config.bind("Enter", "insert-newline");
    config.bind("Tab", "insert-tab");
    config.bind("Backspace", "delete-backward");
    config.bind("^H", "delete-backward");
    config.bind("Delete", "delete-forward");

    // Screen
    config.bind("^L", "redraw");
    config.bind("Esc", "redraw");

    // =========================================================================
    // EDITOR SETTINGS
    // =========================================================================
    // Tab behavior
    config.set("tab-stop", 8i64); // Columns per tab stop
    config.set("soft-tabs", 0i64); // Non-zero: Tab inserts spaces, Backspace removes a stop

    // Line wrapping
    config.set("soft-wrap", false); // Wrap long rows on screen only
    config.set("hard-wrap", false); // Break rows at the last space while typing

    // Unsaved changes: how many times quit/close must be pressed to discard them
    config.set("quit-times", 3i64);
}
