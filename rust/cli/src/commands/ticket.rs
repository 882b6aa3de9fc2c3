//! Ticket ledger: open, claim, unclaim, complete, close and show.

use std::io::Write;

use crate::cli::TicketAction;
use crate::error::CliError;
use crate::store::{DeskStore, Ticket, TicketDetails, Tier};

pub fn handle_ticket_command(
    store: &mut DeskStore,
    action: TicketAction,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match action {
        TicketAction::OpenMm {
            channel,
            creator,
            tier,
            trader,
            giving,
            receiving,
            both_join,
            tip,
        } => {
            let tier: Tier = tier.parse()?;
            let details = TicketDetails::Middleman {
                tier,
                trader,
                giving,
                receiving,
                both_join,
                tip,
            };
            let ticket = store.open_ticket(&channel, &creator, details)?;
            writeln!(
                out,
                "Ticket {} opened by {} ({} middleman)",
                ticket.channel_id,
                ticket.creator,
                tier.range()
            )?;
        }
        TicketAction::OpenSupport {
            channel,
            creator,
            reason,
            details,
        } => {
            let ticket =
                store.open_ticket(&channel, &creator, TicketDetails::Support { reason, details })?;
            writeln!(
                out,
                "Ticket {} opened by {} (support)",
                ticket.channel_id, ticket.creator
            )?;
        }
        TicketAction::Claim { channel, user } => {
            let ticket = store.claim(&channel, &user)?;
            writeln!(
                out,
                "Ticket {} claimed by {}. Only the claimer and {} can talk now.",
                ticket.channel_id, user, ticket.creator
            )?;
        }
        TicketAction::Unclaim {
            channel,
            user,
            admin,
        } => {
            let ticket = store.unclaim(&channel, &user, admin)?;
            writeln!(
                out,
                "Ticket {} unclaimed by {}. Eligible middlemen can claim it again.",
                ticket.channel_id, user
            )?;
        }
        TicketAction::Complete { channel, user } => {
            let stats = store.complete(&channel, &user)?;
            writeln!(
                out,
                "Trade in {} completed. {} now has {} completed ticket(s).",
                channel, stats.user_id, stats.tickets_completed
            )?;
        }
        TicketAction::Close { channel } => {
            let ticket = store.close(&channel)?;
            writeln!(out, "Ticket {} closed.", ticket.channel_id)?;
        }
        TicketAction::Show { channel } => {
            let ticket: Ticket = store.ticket(&channel)?;
            let json = serde_json::to_string_pretty(&ticket).map_err(std::io::Error::other)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
