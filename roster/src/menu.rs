//! The numbered main menu and dice menu.
//!
//! Lookup failures and rule errors are reported on the console and the
//! menu carries on. End of input leaves the menu cleanly from any prompt.

use roster_core::selection::{self, SelectionError};
use roster_core::{Console, Roster, RosterError, RulesError};
use tracing::debug;

const MAIN_MENU: &str = "\n1. Add a new character\n\
2. Level up your character\n\
3. Display character\n\
4. Search for character\n\
5. Update character\n\
6. Delete character\n\
7. Dice rolling menu\n\
8. Exit DnD Character Creator\n";

const DICE_MENU: &str = "\n1. Roll a D20\n\
2. Roll a D20 with modifiers\n\
3. Make an attack roll with currently equipped weapon\n\
4. Roll for damage with currently equipped weapon\n\
5. Exit dice rolling menu\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    Add,
    LevelUp,
    Display,
    Search,
    Update,
    Delete,
    Dice,
    Exit,
}

impl MainChoice {
    fn from_number(n: i64) -> Option<Self> {
        Some(match n {
            1 => Self::Add,
            2 => Self::LevelUp,
            3 => Self::Display,
            4 => Self::Search,
            5 => Self::Update,
            6 => Self::Delete,
            7 => Self::Dice,
            8 => Self::Exit,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiceChoice {
    D20,
    WithModifier,
    Attack,
    Damage,
    Back,
}

impl DiceChoice {
    fn from_number(n: i64) -> Option<Self> {
        Some(match n {
            1 => Self::D20,
            2 => Self::WithModifier,
            3 => Self::Attack,
            4 => Self::Damage,
            5 => Self::Back,
            _ => return None,
        })
    }
}

/// How a menu action ended.
enum Flow {
    Continue,
    Quit,
}

/// Run the main menu until the user exits or input ends.
pub fn run(roster: &mut Roster, console: &mut dyn Console) -> Result<(), RosterError> {
    console.print("\nWelcome to the DnD Character Creator!\n");
    loop {
        console.print(MAIN_MENU);
        let choice = match read_choice(console, MainChoice::from_number)? {
            Some(choice) => choice,
            None => return Ok(()),
        };
        debug!(?choice, "main menu");

        let result = match choice {
            MainChoice::Add => roster.create_interactive(console).map(|_| ()),
            MainChoice::LevelUp => level_up(roster, console),
            MainChoice::Display => {
                display_all(roster, console);
                Ok(())
            }
            MainChoice::Search => search(roster, console),
            MainChoice::Update => update(roster, console),
            MainChoice::Delete => delete(roster, console),
            MainChoice::Dice => match dice_menu(roster, console)? {
                Flow::Continue => Ok(()),
                Flow::Quit => return Ok(()),
            },
            MainChoice::Exit => {
                console.print("Exiting DnD Character Creator...\n");
                return Ok(());
            }
        };

        match result {
            Ok(()) => {}
            Err(RosterError::InputClosed) => return Ok(()),
            Err(RosterError::Io(e)) => return Err(RosterError::Io(e)),
            Err(e) => report(console, &e),
        }
    }
}

/// Read a menu number. `None` when input has ended.
fn read_choice<T>(
    console: &mut dyn Console,
    parse: impl Fn(i64) -> Option<T>,
) -> Result<Option<T>, RosterError> {
    loop {
        let line = match selection::prompt_line(console, "Enter your choice: ") {
            Ok(line) => line,
            Err(SelectionError::InputClosed) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match line.parse::<i64>().ok().map(&parse) {
            Some(Some(choice)) => return Ok(Some(choice)),
            Some(None) => console.print("\nInvalid choice, please try again...\n\n"),
            None => console.print("Invalid input. Please enter a number.\n\n"),
        }
    }
}

fn report(console: &mut dyn Console, error: &RosterError) {
    let message = match error {
        RosterError::NotFound(_) => "Your character could not be found :(".to_string(),
        RosterError::Rules(RulesError::NoWeapon) => {
            "Your character has no weapon equipped.".to_string()
        }
        other => format!("Error: {other}"),
    };
    console.print(&format!("\n{message}\n\n"));
}

fn level_up(roster: &mut Roster, console: &mut dyn Console) -> Result<(), RosterError> {
    let name = selection::prompt_line(console, "Enter the name of the character to level up: ")?;
    roster.level_up_interactive(console, &name)?;
    Ok(())
}

fn display_all(roster: &Roster, console: &mut dyn Console) {
    if roster.is_empty() {
        console.print("\nNo characters in the list...\nPlease enter a character first\n\n");
        return;
    }
    console.print("List of characters:\n\n");
    for sheet in roster.sheets() {
        console.print(&sheet.to_string());
    }
}

fn search(roster: &Roster, console: &mut dyn Console) -> Result<(), RosterError> {
    let name = selection::prompt_line(
        console,
        "Enter the name of the character to search for: ",
    )?;
    let sheet = roster.sheet(&name)?;
    console.print(&sheet.to_string());
    Ok(())
}

fn update(roster: &mut Roster, console: &mut dyn Console) -> Result<(), RosterError> {
    let name = selection::prompt_line(console, "Enter the name of your character to update: ")?;
    roster.update_interactive(console, &name)?;
    Ok(())
}

fn delete(roster: &mut Roster, console: &mut dyn Console) -> Result<(), RosterError> {
    let name = selection::prompt_line(console, "Enter the name of your character to delete: ")?;
    roster.delete(&name)?;
    console.print("\nYour character has been deleted...\n\n");
    Ok(())
}

fn dice_menu(roster: &mut Roster, console: &mut dyn Console) -> Result<Flow, RosterError> {
    loop {
        console.print(DICE_MENU);
        let choice = match read_choice(console, DiceChoice::from_number)? {
            Some(choice) => choice,
            None => return Ok(Flow::Quit),
        };
        debug!(?choice, "dice menu");

        let result = match choice {
            DiceChoice::D20 => Ok(roster.roll_d20()),
            DiceChoice::WithModifier => roll_with_modifier(roster, console),
            DiceChoice::Attack => selection::prompt_line(
                console,
                "Enter the name of your character you would like to attack with: ",
            )
            .map_err(RosterError::from)
            .and_then(|name| roster.attack_roll(&name)),
            DiceChoice::Damage => selection::prompt_line(
                console,
                "Enter the name of your character you would like to roll for damage with: ",
            )
            .map_err(RosterError::from)
            .and_then(|name| roster.damage_roll(&name)),
            DiceChoice::Back => return Ok(Flow::Continue),
        };

        match result {
            Ok(roll) => {
                debug!(%roll, "rolled");
                console.print(&format!("You rolled: {}\n\n", roll.total));
            }
            Err(RosterError::InputClosed) => return Ok(Flow::Quit),
            Err(RosterError::Io(e)) => return Err(RosterError::Io(e)),
            Err(e) => report(console, &e),
        }
    }
}

fn roll_with_modifier(
    roster: &mut Roster,
    console: &mut dyn Console,
) -> Result<roster_core::RollResult, RosterError> {
    let name = selection::prompt_line(console, "Enter the name of your character: ")?;
    roster.find(&name)?;
    let ability = selection::select_ability_or_none(console)?;
    roster.roll_with_modifier(&name, ability)
}
