//! The onboarding / browsing state machine.
//!
//! [`transition`] is the single transition function: given the current
//! [`Step`], the collected [`WizardContext`] and a [`NavEvent`], it returns
//! the next step and context or a [`NavError`]. [`Navigator`] owns the
//! current state and applies events to it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use linkup_shared::models::Location;
use linkup_shared::types::{GroupId, Persona, UserAction};

use crate::error::NavError;
use crate::navigation::context::{Fragment, WizardContext};
use crate::navigation::step::{Step, StepKind};

/// Input from a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEvent {
    SelectPersonaAndAction {
        persona: Persona,
        action: UserAction,
    },
    /// A wizard screen's Continue. Submitting a `Location` fragment is
    /// the location screen's save.
    Submit {
        fragment: Fragment,
    },
    ConfirmPreview,
    OpenGroup {
        group_id: GroupId,
    },
    Back,
    Restart,
}

impl NavEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::SelectPersonaAndAction { .. } => "select_persona_and_action",
            NavEvent::Submit { fragment } => submit_event_name(fragment),
            NavEvent::ConfirmPreview => "confirm_preview",
            NavEvent::OpenGroup { .. } => "open_group",
            NavEvent::Back => "back",
            NavEvent::Restart => "restart",
        }
    }
}

/// First screen for a persona and action.
pub fn select_persona_and_action(persona: Persona, action: UserAction) -> Step {
    use Persona::*;
    use UserAction::*;

    match (persona, action) {
        (Business, Create) => Step::BusinessProfile,
        (Business, Join) => Step::BusinessNiche,
        (Freelancer, Create | Join) => Step::FreelancerGig,
        (OccupationProvider, Create) => Step::ServiceSelection,
        (OccupationProvider, Join) => Step::Location,
        (SocialMediaInfluencer, Create) => Step::InfluencerProfile,
        (SocialMediaInfluencer, Join) => Step::InfluencerNiche,
        (p, View) => Step::Browse {
            filter: p.browse_filter(),
        },
    }
}

pub fn transition(
    step: &Step,
    ctx: &WizardContext,
    event: NavEvent,
) -> Result<(Step, WizardContext), NavError> {
    match (step, event) {
        (_, NavEvent::Restart) => Ok((Step::PersonaSelection, WizardContext::default())),

        (Step::PersonaSelection, NavEvent::SelectPersonaAndAction { persona, action }) => Ok((
            select_persona_and_action(persona, action),
            WizardContext::start(persona, action),
        )),

        (_, NavEvent::Submit { fragment }) => advance(step, ctx, fragment),

        (
            Step::BusinessPreview { location, .. }
            | Step::FreelancerPreview { location, .. }
            | Step::ServicePreview { location, .. }
            | Step::InfluencerPreview { location, .. },
            NavEvent::ConfirmPreview,
        ) => {
            let persona = ctx.persona.ok_or(NavError::MissingData {
                step: StepKind::GroupList,
                field: "persona",
            })?;
            let next = Step::GroupList {
                persona,
                niche: ctx.effective_niche(),
                location: location.clone(),
            };
            Ok((next, ctx.clone()))
        }

        (Step::GroupList { .. } | Step::Browse { .. }, NavEvent::OpenGroup { group_id }) => Ok((
            Step::Chat {
                group_id,
                return_to: Box::new(step.clone()),
            },
            ctx.clone(),
        )),

        (_, NavEvent::Back) => Ok((back(step, ctx)?, ctx.clone())),

        (step, event) => Err(NavError::UnexpectedEvent {
            step: step.kind(),
            event: event.name(),
        }),
    }
}

/// Store a wizard fragment and move to the screen's fixed successor.
fn advance(
    step: &Step,
    ctx: &WizardContext,
    fragment: Fragment,
) -> Result<(Step, WizardContext), NavError> {
    let next = match (step, &fragment) {
        (Step::BusinessProfile, Fragment::Business(_)) => Some(Step::Location),
        (Step::BusinessNiche | Step::InfluencerNiche, Fragment::Niche(_)) => Some(Step::Location),
        (Step::FreelancerGig, Fragment::Gig(_)) => match ctx.action {
            Some(UserAction::Create) => Some(Step::Portfolio),
            _ => Some(Step::Location),
        },
        (Step::Portfolio, Fragment::Portfolio(_)) => Some(Step::Location),
        (Step::ServiceSelection, Fragment::Services(_)) => Some(Step::Location),
        (Step::InfluencerProfile, Fragment::Influencer(_)) => Some(Step::Location),
        (Step::Location, Fragment::Location(_)) => None,
        _ => {
            return Err(NavError::UnexpectedEvent {
                step: step.kind(),
                event: submit_event_name(&fragment),
            })
        }
    };

    let ctx = ctx.clone().merge(fragment);
    let next = match next {
        Some(step) => step,
        None => save_location(&ctx)?,
    };
    Ok((next, ctx))
}

fn submit_event_name(fragment: &Fragment) -> &'static str {
    match fragment {
        Fragment::Business(_) => "submit_business",
        Fragment::Niche(_) => "submit_niche",
        Fragment::Gig(_) => "submit_gig",
        Fragment::Portfolio(_) => "submit_portfolio",
        Fragment::Services(_) => "submit_services",
        Fragment::Influencer(_) => "submit_influencer",
        Fragment::Location(_) => "save_location",
    }
}

/// Where the location screen leads, once the location is in the context.
pub fn save_location(ctx: &WizardContext) -> Result<Step, NavError> {
    let missing = |step, field| NavError::MissingData { step, field };

    let persona = ctx.persona.ok_or(missing(StepKind::Location, "persona"))?;
    let action = ctx.action.ok_or(missing(StepKind::Location, "action"))?;
    let location: Location = ctx
        .location
        .clone()
        .ok_or(missing(StepKind::Location, "location"))?;

    match action {
        UserAction::View => Ok(Step::Browse {
            filter: persona.browse_filter(),
        }),
        UserAction::Join => Ok(Step::GroupList {
            persona,
            niche: ctx.effective_niche(),
            location,
        }),
        UserAction::Create => match persona {
            Persona::Business => Ok(Step::BusinessPreview {
                business: ctx
                    .business
                    .clone()
                    .ok_or(missing(StepKind::BusinessPreview, "business"))?,
                location,
            }),
            Persona::Freelancer => Ok(Step::FreelancerPreview {
                gig: ctx
                    .gig
                    .clone()
                    .ok_or(missing(StepKind::FreelancerPreview, "gig"))?,
                portfolio: ctx
                    .portfolio
                    .clone()
                    .ok_or(missing(StepKind::FreelancerPreview, "portfolio"))?,
                location,
            }),
            Persona::OccupationProvider => Ok(Step::ServicePreview {
                services: ctx
                    .services
                    .clone()
                    .ok_or(missing(StepKind::ServicePreview, "services"))?,
                location,
            }),
            Persona::SocialMediaInfluencer => Ok(Step::InfluencerPreview {
                influencer: ctx
                    .influencer
                    .clone()
                    .ok_or(missing(StepKind::InfluencerPreview, "influencer"))?,
                location,
            }),
        },
    }
}

fn back(step: &Step, ctx: &WizardContext) -> Result<Step, NavError> {
    match step {
        Step::PersonaSelection => Err(NavError::NoPreviousStep(StepKind::PersonaSelection)),
        Step::BusinessProfile
        | Step::BusinessNiche
        | Step::FreelancerGig
        | Step::ServiceSelection
        | Step::InfluencerProfile
        | Step::InfluencerNiche
        | Step::Browse { .. } => Ok(Step::PersonaSelection),
        Step::Portfolio => Ok(Step::FreelancerGig),
        Step::Location => Ok(location_predecessor(ctx)),
        Step::BusinessPreview { .. }
        | Step::FreelancerPreview { .. }
        | Step::ServicePreview { .. }
        | Step::InfluencerPreview { .. }
        | Step::GroupList { .. } => Ok(Step::Location),
        Step::Chat { return_to, .. } => Ok((**return_to).clone()),
    }
}

fn location_predecessor(ctx: &WizardContext) -> Step {
    use Persona::*;
    use UserAction::*;

    match (ctx.persona, ctx.action) {
        (Some(Business), Some(Create)) => Step::BusinessProfile,
        (Some(Business), Some(Join)) => Step::BusinessNiche,
        (Some(Freelancer), Some(Create)) => Step::Portfolio,
        (Some(Freelancer), Some(Join)) => Step::FreelancerGig,
        (Some(OccupationProvider), Some(Create)) => Step::ServiceSelection,
        (Some(SocialMediaInfluencer), Some(Create)) => Step::InfluencerProfile,
        (Some(SocialMediaInfluencer), Some(Join)) => Step::InfluencerNiche,
        _ => Step::PersonaSelection,
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Owns the current step and wizard context.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    step: Step,
    context: WizardContext,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            step: Step::PersonaSelection,
            context: WizardContext::default(),
        }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn context(&self) -> &WizardContext {
        &self.context
    }

    /// Apply an event. On error the state is left untouched.
    pub fn apply(&mut self, event: NavEvent) -> Result<&Step, NavError> {
        let event_name = event.name();
        let (step, context) = transition(&self.step, &self.context, event)?;

        debug!(
            from = %self.step.kind(),
            to = %step.kind(),
            event = event_name,
            "Navigation transition"
        );

        self.step = step;
        self.context = context;
        Ok(&self.step)
    }

    pub fn select_persona_and_action(
        &mut self,
        persona: Persona,
        action: UserAction,
    ) -> Result<&Step, NavError> {
        self.apply(NavEvent::SelectPersonaAndAction { persona, action })
    }

    pub fn submit(&mut self, fragment: Fragment) -> Result<&Step, NavError> {
        self.apply(NavEvent::Submit { fragment })
    }

    pub fn save_location(&mut self, location: Location) -> Result<&Step, NavError> {
        self.submit(Fragment::Location(location))
    }

    pub fn confirm_preview(&mut self) -> Result<&Step, NavError> {
        self.apply(NavEvent::ConfirmPreview)
    }

    pub fn open_group(&mut self, group_id: GroupId) -> Result<&Step, NavError> {
        self.apply(NavEvent::OpenGroup { group_id })
    }

    pub fn back(&mut self) -> Result<&Step, NavError> {
        self.apply(NavEvent::Back)
    }

    pub fn restart(&mut self) -> &Step {
        let applied = self.apply(NavEvent::Restart).map(|_| ());
        if let Err(error) = applied {
            warn!(%error, "Restart rejected, resetting state directly");
            self.step = Step::PersonaSelection;
            self.context = WizardContext::default();
        }
        &self.step
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use linkup_shared::models::{
        BusinessProfile, GigProfile, InfluencerProfile, MediaFile, Portfolio, ServiceSelection,
    };
    use linkup_shared::types::BrowseFilter;

    use super::*;

    fn pune() -> Location {
        Location::new("India", "Maharashtra", "Pune")
    }

    fn business() -> BusinessProfile {
        BusinessProfile {
            name: "Chai Point".into(),
            category: "cafe".into(),
            description: "Tea and snacks".into(),
            website: None,
        }
    }

    fn gig() -> GigProfile {
        GigProfile {
            title: "Logo design".into(),
            category: "design".into(),
            skills: vec!["illustrator".into()],
            description: "Brand marks".into(),
            hourly_rate: Some(40),
        }
    }

    fn portfolio() -> Portfolio {
        Portfolio {
            items: vec![MediaFile {
                file_name: "logo.png".into(),
                mime_type: "image/png".into(),
                size: 4,
                data_url: "data:image/png;base64,AAAA".into(),
            }],
        }
    }

    #[test]
    fn every_persona_action_pair_has_a_documented_step() {
        let documented = [
            "business-profile",
            "business-niche",
            "freelancer-gig",
            "service-selection",
            "location",
            "influencer-profile",
            "influencer-niche",
            "browse",
        ];

        for persona in Persona::ALL {
            for action in UserAction::ALL {
                let step = select_persona_and_action(persona, action);
                assert!(
                    documented.contains(&step.name()),
                    "{persona}+{action} -> {}",
                    step.name()
                );
            }
        }
    }

    #[test]
    fn documented_examples() {
        assert_eq!(
            select_persona_and_action(Persona::Business, UserAction::Join).name(),
            "business-niche"
        );
        assert_eq!(
            select_persona_and_action(Persona::Freelancer, UserAction::Create).name(),
            "freelancer-gig"
        );
        assert_eq!(
            select_persona_and_action(Persona::OccupationProvider, UserAction::View),
            Step::Browse {
                filter: BrowseFilter::LocalServices
            }
        );
        assert_eq!(
            select_persona_and_action(Persona::Business, UserAction::Create),
            Step::BusinessProfile
        );
    }

    #[test]
    fn business_create_flow_reaches_preview_then_groups() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Business, UserAction::Create)
            .unwrap();
        assert_eq!(nav.submit(Fragment::Business(business())).unwrap(), &Step::Location);

        let step = nav.save_location(pune()).unwrap().clone();
        assert_eq!(
            step,
            Step::BusinessPreview {
                business: business(),
                location: pune()
            }
        );

        let step = nav.confirm_preview().unwrap().clone();
        assert_eq!(
            step,
            Step::GroupList {
                persona: Persona::Business,
                niche: Some("cafe".into()),
                location: pune()
            }
        );
    }

    #[test]
    fn freelancer_create_goes_through_portfolio_but_join_skips_it() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Freelancer, UserAction::Create)
            .unwrap();
        assert_eq!(nav.submit(Fragment::Gig(gig())).unwrap(), &Step::Portfolio);
        assert_eq!(
            nav.submit(Fragment::Portfolio(portfolio())).unwrap(),
            &Step::Location
        );
        assert_eq!(nav.save_location(pune()).unwrap().kind(), StepKind::FreelancerPreview);

        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Freelancer, UserAction::Join)
            .unwrap();
        assert_eq!(nav.submit(Fragment::Gig(gig())).unwrap(), &Step::Location);
        assert_eq!(nav.save_location(pune()).unwrap().kind(), StepKind::GroupList);
    }

    #[test]
    fn save_location_branches_on_persona_and_action() {
        let cases = [
            (Persona::OccupationProvider, UserAction::Join, StepKind::GroupList),
            (Persona::SocialMediaInfluencer, UserAction::Join, StepKind::GroupList),
            (Persona::Business, UserAction::View, StepKind::Browse),
        ];
        for (persona, action, expected) in cases {
            let ctx = WizardContext::start(persona, action).merge(Fragment::Location(pune()));
            assert_eq!(save_location(&ctx).unwrap().kind(), expected);
        }

        let ctx = WizardContext::start(Persona::OccupationProvider, UserAction::Create)
            .merge(Fragment::Services(ServiceSelection {
                trade: "plumbing".into(),
                services: vec!["boilers".into()],
                service_radius_km: Some(10),
            }))
            .merge(Fragment::Location(pune()));
        assert_eq!(save_location(&ctx).unwrap().kind(), StepKind::ServicePreview);

        let ctx = WizardContext::start(Persona::SocialMediaInfluencer, UserAction::Create)
            .merge(Fragment::Influencer(InfluencerProfile {
                handle: "@chef".into(),
                niche: "food".into(),
                platforms: vec!["instagram".into()],
                follower_count: None,
            }))
            .merge(Fragment::Location(pune()));
        assert_eq!(save_location(&ctx).unwrap().kind(), StepKind::InfluencerPreview);
    }

    #[test]
    fn preview_requires_its_fragments() {
        let ctx = WizardContext::start(Persona::Business, UserAction::Create);
        let err = transition(
            &Step::Location,
            &ctx,
            NavEvent::Submit {
                fragment: Fragment::Location(pune()),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            NavError::MissingData {
                step: StepKind::BusinessPreview,
                field: "business"
            }
        );

        let ctx = WizardContext::start(Persona::Freelancer, UserAction::Create)
            .merge(Fragment::Gig(gig()));
        let err = transition(
            &Step::Location,
            &ctx,
            NavEvent::Submit {
                fragment: Fragment::Location(pune()),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            NavError::MissingData {
                step: StepKind::FreelancerPreview,
                field: "portfolio"
            }
        );
    }

    #[test]
    fn wrong_fragment_leaves_state_unchanged() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Business, UserAction::Join)
            .unwrap();
        let before = nav.clone();

        let err = nav.submit(Fragment::Gig(gig())).unwrap_err();
        assert_eq!(
            err,
            NavError::UnexpectedEvent {
                step: StepKind::BusinessNiche,
                event: "submit_gig"
            }
        );
        assert_eq!(nav, before);
    }

    #[test]
    fn persona_can_only_be_picked_on_the_first_screen() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Business, UserAction::Join)
            .unwrap();
        assert!(nav
            .select_persona_and_action(Persona::Freelancer, UserAction::Join)
            .is_err());
    }

    #[test]
    fn back_edges() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.back().unwrap_err(),
            NavError::NoPreviousStep(StepKind::PersonaSelection)
        );

        nav.select_persona_and_action(Persona::Freelancer, UserAction::Create)
            .unwrap();
        nav.submit(Fragment::Gig(gig())).unwrap();
        nav.submit(Fragment::Portfolio(portfolio())).unwrap();
        assert_eq!(nav.back().unwrap(), &Step::Portfolio);
        assert_eq!(nav.back().unwrap(), &Step::FreelancerGig);
        assert_eq!(nav.back().unwrap(), &Step::PersonaSelection);
    }

    #[test]
    fn location_back_depends_on_branch() {
        let cases = [
            (Persona::Business, UserAction::Create, Step::BusinessProfile),
            (Persona::Business, UserAction::Join, Step::BusinessNiche),
            (Persona::Freelancer, UserAction::Create, Step::Portfolio),
            (Persona::Freelancer, UserAction::Join, Step::FreelancerGig),
            (Persona::OccupationProvider, UserAction::Create, Step::ServiceSelection),
            (Persona::OccupationProvider, UserAction::Join, Step::PersonaSelection),
            (Persona::SocialMediaInfluencer, UserAction::Create, Step::InfluencerProfile),
            (Persona::SocialMediaInfluencer, UserAction::Join, Step::InfluencerNiche),
        ];
        for (persona, action, expected) in cases {
            let ctx = WizardContext::start(persona, action);
            let (step, _) = transition(&Step::Location, &ctx, NavEvent::Back).unwrap();
            assert_eq!(step, expected, "{persona}+{action}");
        }
    }

    #[test]
    fn previews_and_group_list_go_back_to_location() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Business, UserAction::Create)
            .unwrap();
        nav.submit(Fragment::Business(business())).unwrap();
        assert_eq!(nav.save_location(pune()).unwrap().kind(), StepKind::BusinessPreview);
        assert_eq!(nav.back().unwrap(), &Step::Location);

        nav.save_location(pune()).unwrap();
        assert_eq!(nav.confirm_preview().unwrap().kind(), StepKind::GroupList);
        assert_eq!(nav.back().unwrap(), &Step::Location);

        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::OccupationProvider, UserAction::Join)
            .unwrap();
        assert_eq!(nav.save_location(pune()).unwrap().kind(), StepKind::GroupList);
        assert_eq!(nav.back().unwrap(), &Step::Location);
        assert_eq!(nav.back().unwrap(), &Step::PersonaSelection);
    }

    #[test]
    fn chat_returns_to_origin() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::OccupationProvider, UserAction::View)
            .unwrap();
        let browse = nav.step().clone();

        let gid = GroupId::new();
        assert_eq!(nav.open_group(gid).unwrap().kind(), StepKind::Chat);
        assert_eq!(nav.back().unwrap(), &browse);
    }

    #[test]
    fn open_group_outside_listing_is_rejected() {
        let mut nav = Navigator::new();
        assert!(matches!(
            nav.open_group(GroupId::new()),
            Err(NavError::UnexpectedEvent { .. })
        ));
    }

    #[test]
    fn restart_clears_context() {
        let mut nav = Navigator::new();
        nav.select_persona_and_action(Persona::Business, UserAction::Join)
            .unwrap();
        nav.submit(Fragment::Niche("retail".into())).unwrap();

        nav.apply(NavEvent::Restart).unwrap();
        assert_eq!(nav.step(), &Step::PersonaSelection);
        assert_eq!(nav.context(), &WizardContext::default());

        nav.select_persona_and_action(Persona::Freelancer, UserAction::Create)
            .unwrap();
        nav.submit(Fragment::Gig(gig())).unwrap();
        assert_eq!(nav.restart(), &Step::PersonaSelection);
        assert_eq!(nav.context(), &WizardContext::default());
    }

    #[test]
    fn events_deserialize_from_json() {
        let event: NavEvent = serde_json::from_str(
            r#"{"type":"select_persona_and_action","persona":"business","action":"join"}"#,
        )
        .unwrap();
        let (step, _) = transition(&Step::PersonaSelection, &WizardContext::default(), event).unwrap();
        assert_eq!(step, Step::BusinessNiche);
    }
}
