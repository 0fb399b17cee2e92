use std::fmt;

use anyhow::Result;
use dashboard_core::{ActiveWidget, Shell, Tab};
use inquire::{Select, Text};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    EnterAmount,
    Generate,
    Retry,
    SwitchTab,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search city",
            Action::EnterAmount => "Enter amount",
            Action::Generate => "Generate quote",
            Action::Retry => "Retry",
            Action::SwitchTab => "Switch tab",
            Action::Quit => "Quit",
        })
    }
}

fn actions(widget: &ActiveWidget) -> Vec<Action> {
    let mut actions = match widget {
        ActiveWidget::Weather(w) if w.state().error().is_some() => {
            vec![Action::Retry, Action::Search]
        }
        ActiveWidget::Weather(_) => vec![Action::Search],
        ActiveWidget::Currency(w) if w.state().error().is_some() => {
            vec![Action::EnterAmount, Action::Retry]
        }
        ActiveWidget::Currency(_) => vec![Action::EnterAmount],
        ActiveWidget::Quote(_) => vec![Action::Generate],
    };
    actions.extend([Action::SwitchTab, Action::Quit]);
    actions
}

/// Interactive loop: show the active widget, ask what to do, repeat.
/// Escape at the action prompt quits.
pub async fn run(shell: &mut Shell) -> Result<()> {
    mount(shell).await;

    loop {
        show(shell);

        let Some(action) = Select::new("Action:", actions(shell.widget())).prompt_skippable()?
        else {
            return Ok(());
        };

        match action {
            Action::Quit => return Ok(()),
            Action::SwitchTab => {
                let Some(tab) = Select::new("Tab:", Tab::all().to_vec()).prompt_skippable()? else {
                    continue;
                };
                if shell.navigate(tab) {
                    mount(shell).await;
                }
            }
            Action::Search => {
                if let ActiveWidget::Weather(w) = shell.widget_mut() {
                    let Some(city) = Text::new("City:")
                        .with_initial_value(w.city())
                        .prompt_skippable()?
                    else {
                        continue;
                    };
                    w.set_city(city);
                    let fetch = w.search();
                    println!("{}", render::weather(w));
                    w.apply(fetch.await);
                }
            }
            Action::EnterAmount => {
                if let ActiveWidget::Currency(w) = shell.widget_mut() {
                    let Some(amount) = Text::new("Amount (INR):")
                        .with_initial_value(w.input())
                        .prompt_skippable()?
                    else {
                        continue;
                    };
                    if let Some(fetch) = w.set_input(amount) {
                        println!("{}", render::currency(w));
                        w.apply(fetch.await);
                    }
                }
            }
            Action::Generate => {
                if let ActiveWidget::Quote(w) = shell.widget_mut() {
                    let fetch = w.generate();
                    println!("{}", render::quote(w));
                    w.apply(fetch.await);
                }
            }
            Action::Retry => match shell.widget_mut() {
                ActiveWidget::Weather(w) => {
                    let fetch = w.retry();
                    println!("{}", render::weather(w));
                    w.apply(fetch.await);
                }
                ActiveWidget::Currency(w) => {
                    if let Some(fetch) = w.retry() {
                        println!("{}", render::currency(w));
                        w.apply(fetch.await);
                    }
                }
                ActiveWidget::Quote(_) => {}
            },
        }
    }
}

/// Issues the request a freshly shown widget makes on its own.
pub async fn mount(shell: &mut Shell) {
    match shell.widget_mut() {
        ActiveWidget::Weather(w) => {
            let fetch = w.mount();
            w.apply(fetch.await);
        }
        ActiveWidget::Currency(w) => {
            if let Some(fetch) = w.mount() {
                w.apply(fetch.await);
            }
        }
        ActiveWidget::Quote(w) => {
            if let Some(fetch) = w.mount() {
                w.apply(fetch.await);
            }
        }
    }
}

fn show(shell: &Shell) {
    println!();
    println!("{}", render::tabs(shell.active()));
    println!("{}", "-".repeat(48));
    let body = match shell.widget() {
        ActiveWidget::Weather(w) => render::weather(w),
        ActiveWidget::Currency(w) => render::currency(w),
        ActiveWidget::Quote(w) => render::quote(w),
    };
    print!("{body}");
}
