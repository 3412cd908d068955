//! Card effects.
//!
//! One handler per card kind. Handlers never fail: an effect that cannot
//! find a target resolves as a no-op and says so in the log.

use crate::actions::{Building, FizzleReason, GameEvent, Move};
use crate::bot::{self, Threat};
use crate::cards::{ActionKind, Card, CardId, CardKind, PropertyColor};
use crate::game::GameState;
use crate::payment::{self, PaymentReason, PaymentRequest};
use crate::player::PlayerId;
use crate::property;
use crate::rent;
use crate::turn::PASS_GO_DRAW_COUNT;

/// What a Debt Collector demands
pub const DEBT_COLLECTOR_AMOUNT: u32 = 5;

/// What each player owes on a Birthday
pub const BIRTHDAY_AMOUNT: u32 = 2;

impl GameState {
    /// Resolve a card already removed from the actor's hand
    pub(crate) fn play_card(
        &mut self,
        actor: PlayerId,
        card: Card,
        mv: &Move,
        events: &mut Vec<GameEvent>,
    ) {
        match card.kind {
            CardKind::Money => self.bank_card(actor, card, events),
            CardKind::Property | CardKind::PropertyWild => {
                self.play_property(actor, card, mv.color, events)
            }
            _ if mv.bank => self.bank_card(actor, card, events),
            CardKind::Rent | CardKind::RentWild => self.play_rent(actor, card, mv, events),
            CardKind::Action => self.play_action(actor, card, mv, events),
        }
    }

    fn bank_card(&mut self, actor: PlayerId, card: Card, events: &mut Vec<GameEvent>) {
        let event = GameEvent::CardBanked {
            player: actor,
            card_id: card.id.clone(),
            value: card.value,
        };
        self.player_mut(actor).bank.push(card);
        self.emit(events, event);
    }

    fn play_property(
        &mut self,
        actor: PlayerId,
        mut card: Card,
        color: Option<PropertyColor>,
        events: &mut Vec<GameEvent>,
    ) {
        if card.kind == CardKind::PropertyWild {
            let chosen = color
                .filter(|&c| card.can_take_color(c))
                .or(card.current_color)
                .or_else(|| property::choose_wild_color(&self.players[actor as usize], &card));
            card.current_color = chosen;
        }

        let card_id = card.id.clone();
        let placed = card.current_color;
        self.player_mut(actor).properties.push(card);

        if let Some(color) = placed {
            self.emit(
                events,
                GameEvent::PropertyPlayed {
                    player: actor,
                    card_id,
                    color,
                },
            );
        }
        self.check_win(actor, events);
    }

    fn fizzle(
        &mut self,
        actor: PlayerId,
        card_id: CardId,
        reason: FizzleReason,
        events: &mut Vec<GameEvent>,
    ) {
        self.emit(
            events,
            GameEvent::ActionFizzled {
                player: actor,
                card_id,
                reason,
            },
        );
    }

    // ==================== Rent ====================

    fn play_rent(&mut self, actor: PlayerId, card: Card, mv: &Move, events: &mut Vec<GameEvent>) {
        let candidates = card.eligible_colors();
        let card_id = card.id.clone();
        let card_name = card.name.clone();
        self.discard_pile.push(card);

        let owner = &self.players[actor as usize];
        let color = mv
            .color
            .filter(|&c| candidates.contains(&c) && owner.count_color(c) > 0)
            .or_else(|| rent::best_rent_color(owner, &candidates));
        let Some(color) = color else {
            self.fizzle(actor, card_id, FizzleReason::NoMatchingProperties, events);
            return;
        };

        let targets: Vec<PlayerId> = if rent::is_complete(owner, color) {
            property::opponents(&self.players, actor).map(|p| p.id).collect()
        } else {
            mv.target_player
                .or_else(|| property::richest_opponent(&self.players, actor))
                .into_iter()
                .collect()
        };
        if targets.is_empty() {
            self.fizzle(actor, card_id, FizzleReason::NoValidTarget, events);
            return;
        }

        let mut amount = rent::rent(owner, color);
        let doubled = self.turn.double_rent;
        if doubled {
            amount *= 2;
            self.turn.double_rent = false;
        }

        self.emit(
            events,
            GameEvent::RentCharged {
                player: actor,
                color,
                amount,
                doubled,
                targets: targets.clone(),
            },
        );

        for target in targets {
            let request =
                PaymentRequest::new(target, actor, amount, PaymentReason::Rent, Some(card_id.clone()));
            self.demand(request, Some(Threat::Rent { amount }), &card_name, events);
        }
    }

    // ==================== Actions ====================

    fn play_action(&mut self, actor: PlayerId, card: Card, mv: &Move, events: &mut Vec<GameEvent>) {
        let Some(action) = card.action else {
            self.bank_card(actor, card, events);
            return;
        };
        let card_id = card.id.clone();
        let card_name = card.name.clone();
        self.discard_pile.push(card);
        self.emit(
            events,
            GameEvent::ActionPlayed {
                player: actor,
                action,
            },
        );

        match action {
            ActionKind::PassGo => {
                self.draw_cards(actor, PASS_GO_DRAW_COUNT, events);
            }

            ActionKind::DebtCollector => {
                let target = mv
                    .target_player
                    .or_else(|| property::richest_opponent(&self.players, actor));
                let Some(target) = target else {
                    self.fizzle(actor, card_id, FizzleReason::NoValidTarget, events);
                    return;
                };
                let request = PaymentRequest::new(
                    target,
                    actor,
                    DEBT_COLLECTOR_AMOUNT,
                    PaymentReason::DebtCollector,
                    Some(card_id),
                );
                let threat = Threat::DebtCollector {
                    amount: DEBT_COLLECTOR_AMOUNT,
                };
                self.demand(request, Some(threat), &card_name, events);
            }

            ActionKind::Birthday => {
                let targets: Vec<PlayerId> = property::opponents(&self.players, actor)
                    .map(|p| p.id)
                    .collect();
                for target in targets {
                    let request = PaymentRequest::new(
                        target,
                        actor,
                        BIRTHDAY_AMOUNT,
                        PaymentReason::Birthday,
                        Some(card_id.clone()),
                    );
                    self.demand(request, None, &card_name, events);
                }
            }

            ActionKind::SlyDeal => self.sly_deal(actor, card_id, &card_name, mv, events),
            ActionKind::ForcedDeal => self.forced_deal(actor, card_id, &card_name, mv, events),
            ActionKind::DealBreaker => self.deal_breaker(actor, card_id, &card_name, mv, events),

            ActionKind::JustSayNo => {
                self.emit(events, GameEvent::JustSayNoPlayed { player: actor });
            }

            ActionKind::House | ActionKind::Hotel => {
                self.add_building(actor, card_id, action, mv.color, events);
            }

            ActionKind::DoubleRent => {
                self.turn.double_rent = true;
                self.emit(events, GameEvent::DoubleRentArmed { player: actor });
            }
        }
    }

    /// The explicit target card if it is stealable from `victim`, else the
    /// heuristic pick
    fn steal_choice(&self, actor: PlayerId, victim: PlayerId, requested: Option<&CardId>) -> Option<CardId> {
        let victim = &self.players[victim as usize];
        let thief = &self.players[actor as usize];
        requested
            .filter(|id| property::stealable_properties(victim).any(|c| &c.id == *id))
            .cloned()
            .or_else(|| property::select_stealable(victim, thief))
    }

    fn sly_deal(
        &mut self,
        actor: PlayerId,
        card_id: CardId,
        card_name: &str,
        mv: &Move,
        events: &mut Vec<GameEvent>,
    ) {
        let target = mv
            .target_player
            .or_else(|| property::best_steal_target(&self.players, actor));
        let stolen = target.and_then(|t| {
            self.steal_choice(actor, t, mv.target_card.as_ref())
                .map(|id| (t, id))
        });
        let Some((victim, stolen_id)) = stolen else {
            self.fizzle(actor, card_id, FizzleReason::NoValidTarget, events);
            return;
        };

        if self.offer_block(victim, actor, Threat::SlyDeal, card_name, events) {
            return;
        }

        if let Some(card) = self.player_mut(victim).take_property(&stolen_id) {
            self.player_mut(actor).properties.push(card);
            self.emit(
                events,
                GameEvent::PropertyStolen {
                    thief: actor,
                    victim,
                    card_id: stolen_id,
                },
            );
            self.check_win(actor, events);
        }
    }

    fn forced_deal(
        &mut self,
        actor: PlayerId,
        card_id: CardId,
        card_name: &str,
        mv: &Move,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(given_id) = property::select_give_away(&self.players[actor as usize]) else {
            self.fizzle(actor, card_id, FizzleReason::NothingToOffer, events);
            return;
        };

        let target = mv
            .target_player
            .or_else(|| property::best_steal_target(&self.players, actor));
        let taken = target.and_then(|t| {
            self.steal_choice(actor, t, mv.target_card.as_ref())
                .map(|id| (t, id))
        });
        let Some((victim, taken_id)) = taken else {
            self.fizzle(actor, card_id, FizzleReason::NoValidTarget, events);
            return;
        };

        if self.offer_block(victim, actor, Threat::ForcedDeal, card_name, events) {
            return;
        }

        let given = self.player_mut(actor).take_property(&given_id);
        let taken = self.player_mut(victim).take_property(&taken_id);
        if let (Some(given), Some(taken)) = (given, taken) {
            self.player_mut(victim).properties.push(given);
            self.player_mut(actor).properties.push(taken);
            self.emit(
                events,
                GameEvent::PropertiesSwapped {
                    player: actor,
                    target: victim,
                    given: given_id,
                    taken: taken_id,
                },
            );
            self.check_win(actor, events);
            self.check_win(victim, events);
        }
    }

    fn deal_breaker(
        &mut self,
        actor: PlayerId,
        card_id: CardId,
        card_name: &str,
        mv: &Move,
        events: &mut Vec<GameEvent>,
    ) {
        let choice = match (mv.target_player, mv.color) {
            (Some(target), color) => {
                let sets = rent::completed_set_colors(&self.players[target as usize]);
                color
                    .filter(|c| sets.contains(c))
                    .or_else(|| sets.first().copied())
                    .map(|c| (target, c))
            }
            (None, Some(color)) => property::opponents(&self.players, actor)
                .find(|p| rent::is_complete(p, color))
                .map(|p| (p.id, color))
                .or_else(|| property::deal_breaker_target(&self.players, actor)),
            (None, None) => property::deal_breaker_target(&self.players, actor),
        };
        let Some((victim, color)) = choice else {
            self.fizzle(actor, card_id, FizzleReason::NoValidTarget, events);
            return;
        };

        if self.offer_block(victim, actor, Threat::DealBreaker, card_name, events) {
            return;
        }

        let set = self.player_mut(victim).take_color(color);
        let card_ids = set.iter().map(|c| c.id.clone()).collect();
        self.player_mut(actor).properties.extend(set);
        self.emit(
            events,
            GameEvent::SetStolen {
                thief: actor,
                victim,
                color,
                card_ids,
            },
        );
        self.check_win(actor, events);
    }

    fn add_building(
        &mut self,
        actor: PlayerId,
        card_id: CardId,
        building: ActionKind,
        requested: Option<PropertyColor>,
        events: &mut Vec<GameEvent>,
    ) {
        let owner = &self.players[actor as usize];
        let color = requested
            .filter(|&c| property::can_build(owner, c, building))
            .or_else(|| property::building_target(owner, building));
        let Some(color) = color else {
            self.fizzle(actor, card_id, FizzleReason::NoEligibleSet, events);
            return;
        };

        let properties = &mut self.player_mut(actor).properties;
        let placed = match building {
            ActionKind::Hotel => properties
                .iter_mut()
                .find(|c| c.current_color == Some(color) && c.has_house && !c.has_hotel)
                .map(|c| {
                    c.has_hotel = true;
                    Building::Hotel
                }),
            _ => properties
                .iter_mut()
                .find(|c| c.current_color == Some(color))
                .map(|c| {
                    c.has_house = true;
                    Building::House
                }),
        };

        if let Some(building) = placed {
            self.emit(
                events,
                GameEvent::BuildingAdded {
                    player: actor,
                    color,
                    building,
                },
            );
        }
    }

    // ==================== Payments ====================

    /// Offer a block if a threat applies, then settle the request
    fn demand(
        &mut self,
        request: PaymentRequest,
        threat: Option<Threat>,
        card_name: &str,
        events: &mut Vec<GameEvent>,
    ) {
        if let Some(threat) = threat {
            if self.offer_block(request.debtor, request.creditor, threat, card_name, events) {
                return;
            }
        }
        self.settle(request, events);
    }

    /// Move the resolver's chosen cards from debtor to creditor
    fn settle(&mut self, mut request: PaymentRequest, events: &mut Vec<GameEvent>) {
        let debtor = request.debtor;
        let creditor = request.creditor;

        let chosen = payment::select_payment(&self.players[debtor as usize], request.amount);
        let mut transferred = Vec::with_capacity(chosen.len());
        for id in &chosen {
            if let Some(card) = self.player_mut(debtor).take_tradable(id) {
                transferred.push(card);
            }
        }
        payment::prune_buildings(self.player_mut(debtor));

        let paid = transferred.iter().map(|c| c.value).sum();
        let mut gained_property = false;
        for mut card in transferred {
            if card.is_property() {
                card.clear_buildings();
                gained_property = true;
                self.player_mut(creditor).properties.push(card);
            } else {
                self.player_mut(creditor).bank.push(card);
            }
        }

        request.resolved = true;
        request.paid_card_ids = chosen.clone();
        self.emit(
            events,
            GameEvent::PaymentSettled {
                debtor,
                creditor,
                amount: request.amount,
                paid,
                reason: request.reason,
                card_ids: chosen,
            },
        );
        self.turn.pending_payments.push(request);

        if gained_property {
            self.check_win(creditor, events);
        }
    }

    // ==================== Just Say No ====================

    /// Give a bot target the chance to cancel an attack. Returns true when
    /// the attack is blocked.
    fn offer_block(
        &mut self,
        target: PlayerId,
        attacker: PlayerId,
        threat: Threat,
        card_name: &str,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let defender = &self.players[target as usize];
        if defender.is_human {
            return false;
        }
        let Some(jsn_id) = defender
            .hand
            .iter()
            .find(|c| c.is_action(ActionKind::JustSayNo))
            .map(|c| c.id.clone())
        else {
            return false;
        };

        self.turn.open_window(target);
        let blocked = bot::should_block(defender, &self.players[attacker as usize], threat);
        if blocked {
            if let Some(card) = self.player_mut(target).take_from_hand(&jsn_id) {
                self.discard_pile.push(card);
            }
            self.emit(
                events,
                GameEvent::ActionBlocked {
                    blocker: target,
                    attacker,
                    card_name: card_name.to_string(),
                },
            );
        }
        self.turn.close_window();
        blocked
    }
}
