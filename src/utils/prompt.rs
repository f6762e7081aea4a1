/// Interactive prompts for the analyzer name and title

use std::io;

use colored::Colorize;
use dialoguer::Input;

/// Ask for the new analyzer's base name
pub fn ask_name() -> io::Result<String> {
    println!();
    println!();
    println!("{}", "What would you like to call your new analyzer?".bold());
    println!();
    println!(">>The files under '/src' will be modified to use it.");
    println!(">>Examples include Serial, MySerial, JoesSerial, Gamecube, Wiimote, etc.");
    println!(">>Do not include the trailing word 'Analyzer' this will be added automatically.");
    println!();
    println!("(press CTRL-C to cancel)");
    println!();

    Input::<String>::new()
        .with_prompt("Your new analyzer name")
        .interact_text()
}

/// Ask for the title shown in the "add analyzer" drop down
pub fn ask_title() -> io::Result<String> {
    println!();
    println!();
    println!(
        "{}",
        "What is the analyzer's title? (as shown in the add new analyzer drop down)".bold()
    );
    println!();
    println!(">>Examples include Async Serial, I2C, Joe's Serial, Gamecube, Wiimote, 2Wire, etc.");
    println!();
    println!("(press CTRL-C to cancel)");
    println!();

    Input::<String>::new()
        .with_prompt("Your new analyzer's title")
        .interact_text()
}
