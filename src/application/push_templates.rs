use std::collections::BTreeMap;

use crate::{application::ports::push_notifier::PushNotification, domain::entities::plan::PlanType};

fn notification(title: &str, body: String, data: &[(&str, &str)]) -> PushNotification {
    PushNotification {
        title: title.to_string(),
        body,
        data: data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn boost_activated_push(demand_id: &str) -> PushNotification {
    notification(
        "Boost Ativado! 🚀",
        "Sua demanda agora está impulsionada!".to_string(),
        &[("type", "boost_activated"), ("demandId", demand_id)],
    )
}

pub fn plan_activated_push(plan_type: PlanType) -> PushNotification {
    notification(
        "Plano Ativado! ✅",
        format!("Seu plano {} está ativo!", plan_type.display_name()),
        &[("type", "plan_activated"), ("planType", plan_type.as_str())],
    )
}

pub fn plan_cancelled_push() -> PushNotification {
    notification(
        "Assinatura cancelada",
        "Seu plano voltou para o gratuito.".to_string(),
        &[("type", "plan_cancelled")],
    )
}
