use crate::task::{Task, TaskKind};

/// Las dos listas que muestra el panel.
#[derive(Debug, Default, PartialEq)]
pub struct Views<'a> {
    pub resident: Vec<&'a Task>,
    pub scheduled: Vec<&'a Task>,
}

/// Partición estable por `kind`: cada tarea cae en exactamente una lista y
/// se conserva el orden relativo original.
pub fn split(tasks: &[Task]) -> Views<'_> {
    let mut views = Views::default();
    for task in tasks {
        match task.kind {
            TaskKind::Resident => views.resident.push(task),
            TaskKind::Scheduled => views.scheduled.push(task),
        }
    }
    views
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, kind: TaskKind) -> Task {
        let mut t = Task::blank(kind);
        t.id = id.to_string();
        t
    }

    fn ids(list: &[&Task]) -> Vec<String> {
        list.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn particion_estable_y_disjunta() {
        let tasks = vec![
            task("r1", TaskKind::Resident),
            task("s1", TaskKind::Scheduled),
            task("r2", TaskKind::Resident),
            task("s2", TaskKind::Scheduled),
            task("s3", TaskKind::Scheduled),
        ];

        let views = split(&tasks);
        assert_eq!(ids(&views.resident), vec!["r1", "r2"]);
        assert_eq!(ids(&views.scheduled), vec!["s1", "s2", "s3"]);

        // unión = lista original, intersección vacía
        assert_eq!(views.resident.len() + views.scheduled.len(), tasks.len());
        for t in &tasks {
            let in_r = views.resident.iter().any(|x| std::ptr::eq(*x, t));
            let in_s = views.scheduled.iter().any(|x| std::ptr::eq(*x, t));
            assert!(in_r ^ in_s, "tarea {} debe estar en una sola lista", t.id);
        }
    }

    #[test]
    fn lista_vacia() {
        let views = split(&[]);
        assert!(views.resident.is_empty());
        assert!(views.scheduled.is_empty());
    }
}
